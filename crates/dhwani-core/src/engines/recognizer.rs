//! Speech-recognition engine contract and HTTP client.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::engines::backend::{language_name, AsrBackend, AsrModelSize, ComputeDevice};
use crate::error::Result;

/// Result of a transcription call.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub text: String,
    pub language: String,
    pub language_name: String,
}

/// Narrow contract of the external speech-recognition engine.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe an audio file, optionally biased by a language hint.
    async fn transcribe(&self, audio: &Path, language_hint: Option<&str>)
        -> Result<Transcription>;
}

/// Client for an OpenAI-compatible `/v1/audio/transcriptions` endpoint.
pub struct RemoteRecognizer {
    client: reqwest::Client,
    base_url: String,
    model_id: String,
    device: ComputeDevice,
}

#[derive(Debug, Deserialize)]
struct TranscriptionPayload {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

impl RemoteRecognizer {
    pub fn new(
        base_url: String,
        backend: AsrBackend,
        model_size: AsrModelSize,
        device: ComputeDevice,
    ) -> Self {
        let model_id = match backend {
            AsrBackend::Whisper => format!("whisper-{}", model_size),
            AsrBackend::MetaAsr => "facebook/mms-1b-all".to_string(),
        };
        debug!("Recognizer client: {model_id} at {base_url} ({device})");
        Self {
            client: reqwest::Client::new(),
            base_url,
            model_id,
            device,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn device(&self) -> ComputeDevice {
        self.device
    }
}

#[async_trait]
impl SpeechRecognizer for RemoteRecognizer {
    async fn transcribe(
        &self,
        audio: &Path,
        language_hint: Option<&str>,
    ) -> Result<Transcription> {
        let bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("model", self.model_id.clone());
        if let Some(lang) = language_hint {
            form = form.text("language", lang.to_string());
        }

        let payload: TranscriptionPayload = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let language = payload
            .language
            .or_else(|| language_hint.map(str::to_string))
            .unwrap_or_else(|| "en".to_string());
        let display = language_name(&language).unwrap_or("Unknown").to_string();

        Ok(Transcription {
            text: payload.text.trim().to_string(),
            language,
            language_name: display,
        })
    }
}
