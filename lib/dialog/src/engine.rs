//! The dialog engine.
//!
//! One call to [`DialogEngine::handle`] processes one turn: dispatch the
//! request to a handler, then render the view the handler chose. Dispatch
//! is synchronous; rendering may suspend while variables fetch data.

use crate::directive::{Directive, HandlerOutcome};
use crate::error::DialogError;
use crate::model::ConversationModel;
use crate::registry::Registry;
use crate::request::Request;
use crate::validate::validate;
use crate::variable::VariableResolver;
use crate::view::{RenderedResponse, ViewCatalog};
use rootcause::Report;
use serde::Serialize;
use std::sync::Arc;
use talkfinder_core::{StateName, TurnId, ViewKey};
use tracing::{debug, instrument};

/// A rendered reply and the state the session moves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Text to speak.
    pub speech_text: String,
    /// Text to speak if the user stays silent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt_text: Option<String>,
    /// True if the reply closes the session.
    pub should_end_session: bool,
    /// The session's new state.
    pub next_state: StateName,
}

impl Response {
    fn new(rendered: RenderedResponse, next_state: StateName) -> Self {
        Self {
            should_end_session: rendered.kind.ends_session() || next_state.is_terminal(),
            speech_text: rendered.speech_text,
            reprompt_text: rendered.reprompt_text,
            next_state,
        }
    }
}

/// The result of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A handler produced a directive and its view was rendered.
    Responded(Response),
    /// No handler produced a directive. The state is unchanged.
    Unhandled { state: StateName },
}

impl TurnOutcome {
    /// Returns the state the session is in after this turn.
    #[must_use]
    pub fn state(&self) -> &StateName {
        match self {
            Self::Responded(response) => &response.next_state,
            Self::Unhandled { state } => state,
        }
    }
}

/// Dispatches turns and renders replies.
#[derive(Debug, Clone)]
pub struct DialogEngine {
    registry: Arc<Registry>,
    views: Arc<ViewCatalog>,
    variables: Arc<VariableResolver>,
}

impl DialogEngine {
    /// Creates an engine after validating its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error listing every issue [`validate`] finds.
    pub fn new(
        registry: Arc<Registry>,
        views: Arc<ViewCatalog>,
        variables: Arc<VariableResolver>,
    ) -> Result<Self, Report<DialogError>> {
        let issues = validate(&registry, &views, &variables);
        if !issues.is_empty() {
            return Err(DialogError::InvalidConfiguration { issues }.into());
        }
        debug!(views = views.len(), variables = variables.len(), "dialog engine ready");
        Ok(Self {
            registry,
            views,
            variables,
        })
    }

    /// Returns the handler registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Finds the directive for a request without rendering anything.
    pub fn dispatch(&self, request: &Request, model: &mut ConversationModel) -> HandlerOutcome {
        self.registry.dispatch(request, model)
    }

    /// Renders a view against the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the view or one of its placeholders is unknown.
    pub async fn render(
        &self,
        key: &ViewKey,
        model: &mut ConversationModel,
    ) -> Result<RenderedResponse, Report<DialogError>> {
        let node = self.views.lookup(key)?;
        node.render(&self.variables, model).await
    }

    /// Processes one turn.
    ///
    /// The new state is only reported once the reply has been fully
    /// rendered. An unhandled turn reports the request's own state.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen view or one of its placeholders is
    /// unknown. Both indicate a configuration defect.
    #[instrument(
        skip_all,
        fields(turn = %TurnId::new(), state = %request.state, intent = %request.intent.name)
    )]
    pub async fn handle(
        &self,
        request: &Request,
        model: &mut ConversationModel,
    ) -> Result<TurnOutcome, Report<DialogError>> {
        let Directive { reply, to } = match self.dispatch(request, model) {
            HandlerOutcome::Handled(directive) => directive,
            HandlerOutcome::NotHandled => {
                debug!("turn unhandled");
                return Ok(TurnOutcome::Unhandled {
                    state: request.state.clone(),
                });
            }
        };

        let rendered = self.render(&reply, model).await?;
        debug!(%reply, next_state = %to, "turn handled");
        Ok(TurnOutcome::Responded(Response::new(rendered, to)))
    }
}
