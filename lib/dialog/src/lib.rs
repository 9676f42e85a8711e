//! Dialog engine for the talkfinder voice skill.
//!
//! This crate provides:
//!
//! - **Registry**: state-scoped and global intent handlers, built once
//! - **View catalog**: compiled ask/tell/reprompt templates keyed by view path
//! - **Variable resolver**: named functions that fill template placeholders
//! - **Dialog engine**: dispatches a turn and renders the chosen response

pub mod directive;
pub mod engine;
pub mod error;
pub mod handler;
pub mod model;
pub mod registry;
pub mod request;
pub mod template;
pub mod validate;
pub mod variable;
pub mod view;

pub use directive::{Directive, HandlerOutcome};
pub use engine::{DialogEngine, Response, TurnOutcome};
pub use error::{CatalogError, DialogError, ModelError, RegistryError};
pub use handler::{Handler, Rule, TransitionTable};
pub use model::ConversationModel;
pub use registry::{Registry, RegistryBuilder};
pub use request::{Intent, Request, Slot};
pub use template::{Template, Token};
pub use validate::{ValidationIssue, validate};
pub use variable::{ModelEffects, Variable, VariableResolver, from_fn};
pub use view::{RenderedResponse, ResponseKind, ResponseNode, ViewCatalog};
