//! Text processing endpoints (skip speech recognition).

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use dhwani_core::AgentIntent;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TextRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Serialize)]
pub struct TextResponse {
    pub input: String,
    pub intent: AgentIntent,
    pub response: String,
    pub language: String,
}

pub async fn process_text(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::bad_request("Text must not be empty"));
    }

    let _permit = state.acquire_permit().await;
    let reply = state.agents.process(&req.text, &req.language).await;

    Ok(Json(TextResponse {
        input: req.text,
        intent: reply.intent,
        response: reply.response,
        language: reply.language,
    }))
}

pub async fn reset_conversation(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.pipeline.reset_conversation().await;
    Json(json!({ "status": "ok" }))
}
