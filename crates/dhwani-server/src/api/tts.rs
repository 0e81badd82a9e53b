//! Speech synthesis endpoint.

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use base64::Engine;
use serde::{Deserialize, Serialize};

use dhwani_core::AudioOutput;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Return `{audio_base64, sample_rate}` JSON instead of raw WAV bytes.
    #[serde(default)]
    pub base64: bool,
}

fn default_language() -> String {
    "ml".to_string()
}

#[derive(Serialize)]
struct TtsJsonResponse {
    audio_base64: String,
    sample_rate: u32,
}

pub async fn synthesize_speech(
    State(state): State<AppState>,
    Json(req): Json<TtsRequest>,
) -> Result<Response<Body>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::bad_request("Text must not be empty"));
    }

    let _permit = state.acquire_permit().await;
    let timeout = Duration::from_secs(state.request_timeout_secs);

    let synthesis = tokio::time::timeout(timeout, async {
        let synthesizer = state.pipeline.synthesizer().await?;
        synthesizer.synthesize(&req.text, &req.language, None).await
    })
    .await
    .map_err(|_| ApiError::internal("Request timeout"))??;

    let sample_rate = synthesis.sample_rate;
    let wav_bytes = match synthesis.audio {
        AudioOutput::Samples {
            samples,
            sample_rate,
        } => dhwani_core::audio::encode_wav(&samples, sample_rate)
            .map_err(|err| ApiError::internal(format!("Failed to encode WAV response: {err}")))?,
        AudioOutput::File(path) => tokio::fs::read(&path)
            .await
            .map_err(|err| ApiError::internal(format!("Failed to read synthesized file: {err}")))?,
    };

    if req.base64 {
        let payload = TtsJsonResponse {
            audio_base64: base64::engine::general_purpose::STANDARD.encode(&wav_bytes),
            sample_rate,
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|err| ApiError::internal(format!("Failed to encode response: {err}")))?;
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap());
    }

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .body(Body::from(wav_bytes))
        .unwrap())
}
