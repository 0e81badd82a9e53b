//! Response-generation engine contract and HTTP client.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engines::backend::{ChatModelSize, ComputeDevice};
use crate::error::{Error, Result};

/// One chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Result of one generation call.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    pub tokens_used: usize,
    pub generation_time_ms: f64,
}

/// Narrow contract of the external response-generation engine.
#[async_trait]
pub trait ChatEngine: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], max_new_tokens: usize) -> Result<ChatReply>;
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct RemoteChatEngine {
    client: reqwest::Client,
    base_url: String,
    model_id: &'static str,
    device: ComputeDevice,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionPayload {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug, Deserialize, Default)]
struct CompletionUsage {
    #[serde(default)]
    completion_tokens: usize,
}

impl RemoteChatEngine {
    pub fn new(base_url: String, model_size: ChatModelSize, device: ComputeDevice) -> Self {
        let model_id = model_size.model_id();
        debug!("Chat client: {model_id} at {base_url} ({device})");
        Self {
            client: reqwest::Client::new(),
            base_url,
            model_id,
            device,
        }
    }

    pub fn model_id(&self) -> &'static str {
        self.model_id
    }

    pub fn device(&self) -> ComputeDevice {
        self.device
    }
}

#[async_trait]
impl ChatEngine for RemoteChatEngine {
    async fn chat(&self, messages: &[ChatMessage], max_new_tokens: usize) -> Result<ChatReply> {
        let started = Instant::now();

        let payload: CompletionPayload = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&CompletionRequest {
                model: self.model_id,
                messages,
                max_tokens: max_new_tokens,
                temperature: 0.7,
                top_p: 0.9,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::InferenceError("Chat response contained no choices".to_string()))?;
        let tokens_used = payload.usage.unwrap_or_default().completion_tokens;

        Ok(ChatReply {
            content: content.trim().to_string(),
            tokens_used,
            generation_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}
