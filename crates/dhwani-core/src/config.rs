//! Configuration types for the Dhwani assistant pipeline.

use serde::{Deserialize, Serialize};

use crate::engines::{AsrBackend, AsrModelSize, ChatModelSize, ComputeDevice, TtsBackend};

/// Main pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Speech-recognition backend
    #[serde(default)]
    pub asr_backend: AsrBackend,

    /// Speech-recognition model size
    #[serde(default)]
    pub asr_model_size: AsrModelSize,

    /// Response-generation model size
    #[serde(default)]
    pub chat_model_size: ChatModelSize,

    /// Speech-synthesis backend
    #[serde(default)]
    pub tts_backend: TtsBackend,

    /// Compute target advertised to the model servers
    #[serde(default)]
    pub device: ComputeDevice,

    /// Target language tag for the assistant (e.g. "ml", "hi", "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Whether to run intent detection during the pipeline
    #[serde(default = "default_detect_intent")]
    pub detect_intent: bool,

    /// Whether the intent detector may fall back to the chat model when no
    /// keyword trigger matches
    #[serde(default)]
    pub intent_model_fallback: bool,

    /// Maximum conversation turns kept in the chat history
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// Maximum tokens generated per chat reply
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: usize,

    /// Engine endpoint URLs
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            asr_backend: AsrBackend::default(),
            asr_model_size: AsrModelSize::default(),
            chat_model_size: ChatModelSize::default(),
            tts_backend: TtsBackend::default(),
            device: ComputeDevice::default(),
            language: default_language(),
            detect_intent: default_detect_intent(),
            intent_model_fallback: false,
            max_history_turns: default_max_history_turns(),
            max_new_tokens: default_max_new_tokens(),
            endpoints: EndpointConfig::default(),
        }
    }
}

fn default_language() -> String {
    "ml".to_string()
}

fn default_detect_intent() -> bool {
    true
}

fn default_max_history_turns() -> usize {
    10
}

fn default_max_new_tokens() -> usize {
    256
}

/// Base URLs of the external engine servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_asr_url")]
    pub asr_url: String,

    #[serde(default = "default_translation_url")]
    pub translation_url: String,

    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    #[serde(default = "default_tts_url")]
    pub tts_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            asr_url: default_asr_url(),
            translation_url: default_translation_url(),
            chat_url: default_chat_url(),
            tts_url: default_tts_url(),
        }
    }
}

fn url_from_env(key: &str, fallback: &str) -> String {
    if let Ok(from_env) = std::env::var(key) {
        let trimmed = from_env.trim();
        if !trimmed.is_empty() {
            return trimmed.trim_end_matches('/').to_string();
        }
    }
    fallback.to_string()
}

fn default_asr_url() -> String {
    url_from_env("DHWANI_ASR_URL", "http://127.0.0.1:8101")
}

fn default_translation_url() -> String {
    url_from_env("DHWANI_TRANSLATION_URL", "http://127.0.0.1:8102")
}

fn default_chat_url() -> String {
    url_from_env("DHWANI_CHAT_URL", "http://127.0.0.1:8103")
}

fn default_tts_url() -> String {
    url_from_env("DHWANI_TTS_URL", "http://127.0.0.1:8104")
}
