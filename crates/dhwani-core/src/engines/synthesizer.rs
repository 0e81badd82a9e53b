//! Speech-synthesis engine contract and HTTP client.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::audio::decode_wav_bytes;
use crate::engines::backend::{ComputeDevice, TtsBackend};
use crate::error::Result;

/// Synthesized audio: either raw samples or a file the engine wrote.
#[derive(Debug, Clone)]
pub enum AudioOutput {
    Samples { samples: Vec<f32>, sample_rate: u32 },
    File(PathBuf),
}

impl AudioOutput {
    /// Duration in seconds, when known without touching the filesystem.
    pub fn duration_secs(&self) -> Option<f32> {
        match self {
            Self::Samples {
                samples,
                sample_rate,
            } if *sample_rate > 0 => Some(samples.len() as f32 / *sample_rate as f32),
            _ => None,
        }
    }
}

/// Result of one synthesis call.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub audio: AudioOutput,
    pub sample_rate: u32,
}

/// Narrow contract of the external speech-synthesis engine.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech, optionally persisting the audio to `output_path`.
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        output_path: Option<&Path>,
    ) -> Result<Synthesis>;
}

/// Client for an OpenAI-compatible `/v1/audio/speech` endpoint.
pub struct RemoteSynthesizer {
    client: reqwest::Client,
    base_url: String,
    backend: TtsBackend,
    device: ComputeDevice,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    language: &'a str,
    response_format: &'a str,
}

impl RemoteSynthesizer {
    pub fn new(base_url: String, backend: TtsBackend, device: ComputeDevice) -> Self {
        debug!(
            "Synthesizer client: {} at {base_url} ({device})",
            backend.model_id()
        );
        Self {
            client: reqwest::Client::new(),
            base_url,
            backend,
            device,
        }
    }

    pub fn backend(&self) -> TtsBackend {
        self.backend
    }

    pub fn device(&self) -> ComputeDevice {
        self.device
    }
}

#[async_trait]
impl SpeechSynthesizer for RemoteSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        output_path: Option<&Path>,
    ) -> Result<Synthesis> {
        let wav_bytes = self
            .client
            .post(format!("{}/v1/audio/speech", self.base_url))
            .json(&SpeechRequest {
                model: self.backend.model_id(),
                input: text,
                language,
                response_format: "wav",
            })
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let (samples, sample_rate) = decode_wav_bytes(&wav_bytes)?;

        if let Some(path) = output_path {
            tokio::fs::write(path, &wav_bytes).await?;
            return Ok(Synthesis {
                audio: AudioOutput::File(path.to_path_buf()),
                sample_rate,
            });
        }

        Ok(Synthesis {
            audio: AudioOutput::Samples {
                samples,
                sample_rate,
            },
            sample_rate,
        })
    }
}
