//! The OpenWest conference skill.
//!
//! This crate provides:
//!
//! - **States**: the skill's conversation graph as transition tables
//! - **Views**: the bundled `en-US` response catalog
//! - **Variables**: topic echo, random talk description and talk details
//!
//! [`engine`] assembles these into a validated [`DialogEngine`].

pub mod error;
pub mod states;
pub mod variables;

pub use error::SkillError;
pub use variables::{SESSION_TOPIC, STORED_TALK_DETAILS, TalkDetails};

use std::sync::Arc;
use talkfinder_core::Result;
use talkfinder_dialog::{CatalogError, DialogEngine, VariableResolver, ViewCatalog};
use talkfinder_schedule::TalkSource;
use variables::{RandomSessionDescription, SessionDetails, session_topic};

/// The bundled response catalog.
pub const VIEWS_EN_US: &str = include_str!("../views/en-US.json");

/// Loads the bundled response catalog.
///
/// # Errors
///
/// Returns an error if the bundled JSON is malformed.
pub fn views() -> Result<ViewCatalog, CatalogError> {
    ViewCatalog::from_json_str(VIEWS_EN_US)
}

/// Registers the skill's variables against a talk source.
#[must_use]
pub fn variables(source: Arc<dyn TalkSource>, talk_count: u32) -> VariableResolver {
    VariableResolver::new()
        .with_variable(SESSION_TOPIC, session_topic())
        .with_variable(
            "RandomSessionDescription",
            RandomSessionDescription::new(source, talk_count),
        )
        .with_variable("SessionDetails", SessionDetails)
}

/// Builds the skill's dialog engine.
///
/// # Errors
///
/// Returns an error if the views, registry or their combination is invalid.
pub fn engine(
    source: Arc<dyn TalkSource>,
    talk_count: u32,
) -> Result<DialogEngine, SkillError> {
    let views = views().map_err(|e| SkillError::InvalidViews {
        reason: e.to_string(),
    })?;
    let registry = states::registry().map_err(|e| SkillError::InvalidRegistry {
        reason: e.to_string(),
    })?;
    let engine = DialogEngine::new(
        Arc::new(registry),
        Arc::new(views),
        Arc::new(variables(source, talk_count)),
    )
    .map_err(|e| SkillError::InvalidEngine {
        reason: e.to_string(),
    })?;
    Ok(engine)
}
