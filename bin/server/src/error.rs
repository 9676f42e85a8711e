//! Domain error types for server operations.
//!
//! Startup errors abort the process. Turn errors are answered with a
//! spoken apology so the user never hears internal details.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Spoken when a turn fails for a reason the user cannot fix.
pub const APOLOGY: &str = "Sorry, something went wrong on my end. Please try again later.";

/// Server errors.
#[derive(Debug)]
pub enum ServerError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// The skill could not be assembled.
    Skill { details: String },
    /// The listener could not be bound.
    Bind { address: String, details: String },
    /// The server stopped unexpectedly.
    Serve { details: String },
    /// A turn failed because of a configuration defect.
    Turn { details: String },
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "failed to load configuration: {details}"),
            Self::Skill { details } => write!(f, "failed to build skill: {details}"),
            Self::Bind { address, details } => {
                write!(f, "failed to bind '{address}': {details}")
            }
            Self::Serve { details } => write!(f, "server error: {details}"),
            Self::Turn { details } => write!(f, "turn failed: {details}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = json!({
            "speechText": APOLOGY,
            "shouldEndSession": true,
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
