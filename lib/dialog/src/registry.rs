//! Handler registry and dispatch.
//!
//! The registry is assembled once at startup with [`RegistryBuilder`] and
//! is immutable afterwards. Engines share it behind an `Arc`.

use crate::directive::HandlerOutcome;
use crate::error::RegistryError;
use crate::handler::Handler;
use crate::model::ConversationModel;
use crate::request::Request;
use rootcause::Report;
use std::collections::HashMap;
use talkfinder_core::{IntentName, StateName};
use tracing::debug;

/// Collects handler registrations.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    states: HashMap<StateName, Handler>,
    intents: HashMap<IntentName, Handler>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler reachable from every state.
    ///
    /// Registering the same intent again replaces the earlier handler.
    #[must_use]
    pub fn on_intent(mut self, intent: impl Into<IntentName>, handler: impl Into<Handler>) -> Self {
        let intent = intent.into();
        if self.intents.insert(intent.clone(), handler.into()).is_some() {
            debug!(%intent, "replacing global intent handler");
        }
        self
    }

    /// Registers a handler offered every intent while in `state`.
    ///
    /// Registering the same state again replaces the earlier handler.
    #[must_use]
    pub fn on_state(mut self, state: impl Into<StateName>, handler: impl Into<Handler>) -> Self {
        let state = state.into();
        if self.states.insert(state.clone(), handler.into()).is_some() {
            debug!(%state, "replacing state handler");
        }
        self
    }

    /// Freezes the registrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler was registered for the terminal state.
    pub fn build(self) -> Result<Registry, Report<RegistryError>> {
        if self.states.contains_key(StateName::DIE.as_str()) {
            return Err(RegistryError::TerminalStateHandler {
                state: StateName::DIE,
            }
            .into());
        }
        Ok(Registry {
            states: self.states,
            intents: self.intents,
        })
    }
}

/// Immutable set of state-scoped and global handlers.
#[derive(Debug)]
pub struct Registry {
    states: HashMap<StateName, Handler>,
    intents: HashMap<IntentName, Handler>,
}

impl Registry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Finds the directive for a request.
    ///
    /// The state handler is consulted first; the global handler for the
    /// intent only runs if the state handler is missing or declines.
    pub fn dispatch(&self, request: &Request, model: &mut ConversationModel) -> HandlerOutcome {
        if let Some(handler) = self.states.get(request.state.as_str()) {
            let outcome = handler.handle(request, model);
            if outcome.is_handled() {
                debug!(state = %request.state, intent = %request.intent.name, "handled by state");
                return outcome;
            }
        }

        if let Some(handler) = self.intents.get(request.intent.name.as_str()) {
            let outcome = handler.handle(request, model);
            if outcome.is_handled() {
                debug!(intent = %request.intent.name, "handled by global intent");
                return outcome;
            }
        }

        debug!(state = %request.state, intent = %request.intent.name, "no handler produced a directive");
        HandlerOutcome::NotHandled
    }

    /// Returns the handler for a state.
    #[must_use]
    pub fn state_handler(&self, state: &str) -> Option<&Handler> {
        self.states.get(state)
    }

    /// Returns all state handlers.
    pub fn state_handlers(&self) -> impl Iterator<Item = (&StateName, &Handler)> {
        self.states.iter()
    }

    /// Returns all global intent handlers.
    pub fn intent_handlers(&self) -> impl Iterator<Item = (&IntentName, &Handler)> {
        self.intents.iter()
    }
}
