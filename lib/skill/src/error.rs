//! Error types for assembling the skill.

use std::fmt;

/// Errors from building the skill's dialog engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillError {
    /// The bundled view catalog could not be loaded.
    InvalidViews { reason: String },
    /// The state registry could not be built.
    InvalidRegistry { reason: String },
    /// The engine rejected the assembled configuration.
    InvalidEngine { reason: String },
}

impl fmt::Display for SkillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViews { reason } => write!(f, "invalid view catalog: {reason}"),
            Self::InvalidRegistry { reason } => write!(f, "invalid state registry: {reason}"),
            Self::InvalidEngine { reason } => write!(f, "invalid skill configuration: {reason}"),
        }
    }
}

impl std::error::Error for SkillError {}
