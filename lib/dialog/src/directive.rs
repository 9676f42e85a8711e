//! Handler results.

use serde::{Deserialize, Serialize};
use talkfinder_core::{StateName, ViewKey};

/// What a handler decided: which view to speak and which state to enter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// The view to render as the reply.
    pub reply: ViewKey,
    /// The state the session moves to once the reply is produced.
    pub to: StateName,
}

impl Directive {
    /// Creates a directive.
    #[must_use]
    pub fn new(reply: impl Into<ViewKey>, to: impl Into<StateName>) -> Self {
        Self {
            reply: reply.into(),
            to: to.into(),
        }
    }
}

/// The outcome of offering a request to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The handler produced a directive.
    Handled(Directive),
    /// The handler declined the request.
    NotHandled,
}

impl HandlerOutcome {
    /// Returns true if a directive was produced.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    /// Returns the directive, if any.
    #[must_use]
    pub fn directive(&self) -> Option<&Directive> {
        match self {
            Self::Handled(directive) => Some(directive),
            Self::NotHandled => None,
        }
    }
}

impl From<Directive> for HandlerOutcome {
    fn from(directive: Directive) -> Self {
        Self::Handled(directive)
    }
}

impl From<Option<Directive>> for HandlerOutcome {
    fn from(directive: Option<Directive>) -> Self {
        directive.map_or(Self::NotHandled, Self::Handled)
    }
}
