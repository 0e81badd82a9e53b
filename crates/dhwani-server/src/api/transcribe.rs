//! Audio transcription endpoint.

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
    pub language: String,
    pub language_name: String,
}

/// Parsed multipart upload: audio bytes plus an optional language hint.
pub(crate) struct AudioUpload {
    pub bytes: Vec<u8>,
    pub language: Option<String>,
}

pub(crate) async fn parse_audio_upload(mut multipart: Multipart) -> Result<AudioUpload, ApiError> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("Failed reading multipart field: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" | "file" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::bad_request(format!("Invalid audio field: {err}")))?;
                if !data.is_empty() {
                    bytes = Some(data.to_vec());
                }
            }
            "language" => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| ApiError::bad_request(format!("Invalid text field: {err}")))?;
                let value = value.trim().to_string();
                if !value.is_empty() {
                    language = Some(value);
                }
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    let bytes = bytes.ok_or_else(|| ApiError::bad_request("Missing audio input (`file` or `audio`)"))?;
    Ok(AudioUpload { bytes, language })
}

/// Write the upload to a temp file for the recognizer.
pub(crate) async fn stage_upload(upload: &AudioUpload) -> Result<PathBuf, ApiError> {
    let path = std::env::temp_dir().join(format!("dhwani-upload-{}.wav", Uuid::new_v4()));
    tokio::fs::write(&path, &upload.bytes)
        .await
        .map_err(|err| ApiError::internal(format!("Failed to stage upload: {err}")))?;
    Ok(path)
}

pub async fn transcribe_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
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

    Ok(Json(TranscriptionResponse {
        text: transcription.text,
        language: transcription.language,
        language_name: transcription.language_name,
    }))
}
