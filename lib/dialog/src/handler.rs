//! Intent handlers.
//!
//! A handler is offered a request and either produces a [`Directive`] or
//! declines. Handlers come in three forms:
//!
//! - [`Rule`]: always answers with a fixed reply and target state,
//!   optionally running an effect on the model first
//! - [`TransitionTable`]: maps intent names to rules, declining anything else
//! - a custom closure, for logic the declarative forms cannot express
//!
//! Rules and tables expose their transitions so the engine configuration
//! can be checked before serving traffic. Custom closures are opaque.

use crate::directive::{Directive, HandlerOutcome};
use crate::model::ConversationModel;
use crate::request::Request;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use talkfinder_core::{IntentName, StateName, ViewKey};

/// A side effect a rule runs before producing its directive.
pub type Effect = Arc<dyn Fn(&Request, &mut ConversationModel) + Send + Sync>;

/// An opaque handler function.
pub type HandlerFn = Arc<dyn Fn(&Request, &mut ConversationModel) -> HandlerOutcome + Send + Sync>;

/// A fixed transition: reply with `reply`, then move to `to`.
#[derive(Clone)]
pub struct Rule {
    reply: ViewKey,
    to: StateName,
    effect: Option<Effect>,
}

impl Rule {
    /// Creates a rule without side effects.
    #[must_use]
    pub fn new(reply: impl Into<ViewKey>, to: impl Into<StateName>) -> Self {
        Self {
            reply: reply.into(),
            to: to.into(),
            effect: None,
        }
    }

    /// Runs `effect` against the model whenever this rule fires.
    #[must_use]
    pub fn with_effect(
        mut self,
        effect: impl Fn(&Request, &mut ConversationModel) + Send + Sync + 'static,
    ) -> Self {
        self.effect = Some(Arc::new(effect));
        self
    }

    /// The view this rule replies with.
    #[must_use]
    pub fn reply(&self) -> &ViewKey {
        &self.reply
    }

    /// The state this rule moves to.
    #[must_use]
    pub fn to(&self) -> &StateName {
        &self.to
    }

    /// Fires the rule.
    pub fn apply(&self, request: &Request, model: &mut ConversationModel) -> Directive {
        if let Some(effect) = &self.effect {
            effect(request, model);
        }
        Directive {
            reply: self.reply.clone(),
            to: self.to.clone(),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("reply", &self.reply)
            .field("to", &self.to)
            .field("has_effect", &self.effect.is_some())
            .finish()
    }
}

/// Intent-keyed rules for one scope.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    rules: BTreeMap<IntentName, Rule>,
}

impl TransitionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `intent` to `rule`. A later mapping for the same intent wins.
    #[must_use]
    pub fn on(mut self, intent: impl Into<IntentName>, rule: Rule) -> Self {
        self.rules.insert(intent.into(), rule);
        self
    }

    /// Maps each of `intents` to the same rule.
    #[must_use]
    pub fn on_any<I>(mut self, intents: I, rule: Rule) -> Self
    where
        I: IntoIterator,
        I::Item: Into<IntentName>,
    {
        for intent in intents {
            self.rules.insert(intent.into(), rule.clone());
        }
        self
    }

    /// Returns the rule for an intent.
    #[must_use]
    pub fn get(&self, intent: &str) -> Option<&Rule> {
        self.rules.get(intent)
    }

    /// Returns all (intent, rule) pairs in intent order.
    pub fn iter(&self) -> impl Iterator<Item = (&IntentName, &Rule)> {
        self.rules.iter()
    }

    /// Returns the number of mapped intents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A registered handler.
#[derive(Clone)]
pub enum Handler {
    /// Answers every request it is offered.
    Rule(Rule),
    /// Answers the intents it maps.
    Table(TransitionTable),
    /// Arbitrary logic.
    Custom(HandlerFn),
}

impl Handler {
    /// Wraps a closure as a handler.
    #[must_use]
    pub fn custom(
        handler: impl Fn(&Request, &mut ConversationModel) -> HandlerOutcome + Send + Sync + 'static,
    ) -> Self {
        Self::Custom(Arc::new(handler))
    }

    /// Offers the request to this handler.
    pub fn handle(&self, request: &Request, model: &mut ConversationModel) -> HandlerOutcome {
        match self {
            Self::Rule(rule) => HandlerOutcome::Handled(rule.apply(request, model)),
            Self::Table(table) => match table.get(request.intent.name.as_str()) {
                Some(rule) => HandlerOutcome::Handled(rule.apply(request, model)),
                None => HandlerOutcome::NotHandled,
            },
            Self::Custom(handler) => handler(request, model),
        }
    }

    /// Returns the transitions this handler can take, or `None` if opaque.
    ///
    /// Each entry pairs the intent the rule is keyed on (absent for a bare
    /// rule, which answers any intent it is offered) with the rule.
    #[must_use]
    pub fn transitions(&self) -> Option<Vec<(Option<&IntentName>, &Rule)>> {
        match self {
            Self::Rule(rule) => Some(vec![(None, rule)]),
            Self::Table(table) => Some(table.iter().map(|(i, r)| (Some(i), r)).collect()),
            Self::Custom(_) => None,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(rule) => f.debug_tuple("Rule").field(rule).finish(),
            Self::Table(table) => f.debug_tuple("Table").field(table).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<Rule> for Handler {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

impl From<TransitionTable> for Handler {
    fn from(table: TransitionTable) -> Self {
        Self::Table(table)
    }
}
