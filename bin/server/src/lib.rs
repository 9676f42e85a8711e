//! talkfinder HTTP adapter.
//!
//! Exposes the conference skill's dialog engine as a JSON endpoint.

pub mod config;
pub mod error;
pub mod routes;

use axum::Router;
use axum::routing::{get, post};
use routes::AppState;
use std::sync::Arc;
use talkfinder_dialog::DialogEngine;
use tower_http::trace::TraceLayer;

/// Builds the application router.
pub fn router(engine: Arc<DialogEngine>) -> Router {
    Router::new()
        .route("/skill", post(routes::skill))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { engine })
}
