//! Error types for the dialog crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `DialogError`: Configuration defects surfaced while handling a turn
//! - `RegistryError`: Errors from building the handler registry
//! - `CatalogError`: Errors from loading the view catalog
//! - `ModelError`: Errors from writing structured values into the model

use crate::validate::ValidationIssue;
use std::fmt;
use talkfinder_core::{StateName, ViewKey};

/// Errors from handling a turn.
///
/// Every variant indicates a programming or configuration defect rather
/// than a runtime condition. None of them is recovered inside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// A directive named a view that is not in the catalog.
    UnresolvedViewKey { key: ViewKey },
    /// A template referenced a placeholder with no resolver.
    UnresolvedPlaceholder { name: String },
    /// Static validation of the engine's configuration failed.
    InvalidConfiguration { issues: Vec<ValidationIssue> },
}

impl fmt::Display for DialogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedViewKey { key } => write!(f, "view not found: {key}"),
            Self::UnresolvedPlaceholder { name } => {
                write!(f, "no resolver for placeholder '{{{name}}}'")
            }
            Self::InvalidConfiguration { issues } => {
                write!(f, "invalid dialog configuration: ")?;
                for (i, issue) in issues.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{issue}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DialogError {}

/// Errors from building the handler registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A state handler was registered for the terminal state.
    TerminalStateHandler { state: StateName },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerminalStateHandler { state } => {
                write!(f, "state '{state}' is terminal and cannot have a handler")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Errors from loading the view catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog source is not valid JSON.
    ParseFailed { reason: String },
    /// A node has neither a usable `ask` nor `tell` field.
    InvalidNode { key: String, reason: String },
    /// A node has both `ask` and `tell`.
    AmbiguousNode { key: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseFailed { reason } => {
                write!(f, "failed to parse view catalog: {reason}")
            }
            Self::InvalidNode { key, reason } => {
                write!(f, "invalid view '{key}': {reason}")
            }
            Self::AmbiguousNode { key } => {
                write!(f, "view '{key}' defines both ask and tell")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Errors from conversation model operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A value could not be converted to JSON for storage.
    SerializationFailed { key: String, reason: String },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerializationFailed { key, reason } => {
                write!(f, "failed to store model field '{key}': {reason}")
            }
        }
    }
}

impl std::error::Error for ModelError {}
