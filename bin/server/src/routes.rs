//! HTTP routes.
//!
//! The server keeps no session storage: each request carries the current
//! state and model, and each response returns the updated ones.

use crate::error::ServerError;
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use talkfinder_core::StateName;
use talkfinder_dialog::validate::intents_from;
use talkfinder_dialog::{ConversationModel, DialogEngine, Intent, Request, TurnOutcome};
use tracing::debug;

const FALLBACK_SPEECH: &str = "Sorry, I didn't catch that. What would you like to do?";
const FALLBACK_REPROMPT: &str = "You can say \"help\" to hear what I can do.";
const FALLBACK_GOODBYE: &str = "Sorry, I didn't catch that. Goodbye.";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The skill's dialog engine.
    pub engine: Arc<DialogEngine>,
}

/// Body of `POST /skill`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRequest {
    pub intent: Intent,
    #[serde(default)]
    pub state: StateName,
    #[serde(default)]
    pub model: ConversationModel,
}

/// Response to `POST /skill`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    pub speech_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt_text: Option<String>,
    pub should_end_session: bool,
    pub next_state: StateName,
    pub model: ConversationModel,
}

/// Handles one conversation turn.
pub async fn skill(
    State(state): State<AppState>,
    Json(body): Json<SkillRequest>,
) -> Result<Json<SkillResponse>, ServerError> {
    let SkillRequest {
        intent,
        state: current,
        mut model,
    } = body;
    let request = Request::new(intent, current);

    let outcome = state
        .engine
        .handle(&request, &mut model)
        .await
        .map_err(|e| ServerError::Turn {
            details: e.to_string(),
        })?;

    let response = match outcome {
        TurnOutcome::Responded(response) => SkillResponse {
            speech_text: response.speech_text,
            reprompt_text: response.reprompt_text,
            should_end_session: response.should_end_session,
            next_state: response.next_state,
            model,
        },
        TurnOutcome::Unhandled { state: unchanged } => {
            let expected: Vec<&str> = intents_from(state.engine.registry(), unchanged.as_str())
                .into_iter()
                .map(|intent| intent.as_str())
                .collect();
            debug!(
                intent = %request.intent.name,
                state = %unchanged,
                ?expected,
                "answering unhandled turn with fallback"
            );
            // A finished session is closed again rather than reopened.
            if unchanged.is_terminal() {
                SkillResponse {
                    speech_text: FALLBACK_GOODBYE.to_string(),
                    reprompt_text: None,
                    should_end_session: true,
                    next_state: unchanged,
                    model,
                }
            } else {
                SkillResponse {
                    speech_text: FALLBACK_SPEECH.to_string(),
                    reprompt_text: Some(FALLBACK_REPROMPT.to_string()),
                    should_end_session: false,
                    next_state: unchanged,
                    model,
                }
            }
        }
    };
    Ok(Json(response))
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
