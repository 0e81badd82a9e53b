//! Full audio processing endpoint: transcription followed by the agent
//! graph.

use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use dhwani_core::AgentIntent;

use crate::api::transcribe::{parse_audio_upload, stage_upload};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProcessResponse {
    pub transcription: String,
    pub intent: AgentIntent,
    pub response_text: String,
    pub language: String,
}

pub async fn process_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let upload = parse_audio_upload(multipart).await?;
    let tmp_path = stage_upload(&upload).await?;

    let _permit = state.acquire_permit().await;
    let timeout = Duration::from_secs(state.request_timeout_secs);

    let result = tokio::time::timeout(timeout, async {
        let recognizer = state.pipeline.recognizer().await?;
        recognizer
            .transcribe(&tmp_path, upload.language.as_deref())
            .await
    })
    .await;

    let _ = tokio::fs::remove_file(&tmp_path).await;

    let transcription = result.map_err(|_| ApiError::internal("Request timeout"))??;

    let reply = state
        .agents
        .process(&transcription.text, &transcription.language)
        .await;

    Ok(Json(ProcessResponse {
        transcription: transcription.text,
        intent: reply.intent,
        response_text: reply.response,
        language: reply.language,
    }))
}
