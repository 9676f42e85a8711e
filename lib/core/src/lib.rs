//! Core domain types and utilities for the talkfinder voice skill.
//!
//! This crate provides the foundational types, error handling, and shared
//! identifiers used by the dialog engine, the skill definition and the
//! HTTP adapter.

pub mod error;
pub mod id;
pub mod name;

pub use error::Result;
pub use id::{ParseIdError, TurnId};
pub use name::{IntentName, SlotName, StateName, ViewKey};
