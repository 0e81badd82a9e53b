//! Translation engine contract and HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engines::backend::ComputeDevice;
use crate::error::{Error, Result};

/// Narrow contract of the external translation engine. Bidirectional: it
/// must support at least target-language ↔ English.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Client for a JSON `/translate` endpoint (IndicTrans2-style server).
pub struct RemoteTranslator {
    client: reqwest::Client,
    base_url: String,
    device: ComputeDevice,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslatePayload {
    translation: String,
}

impl RemoteTranslator {
    pub fn new(base_url: String, device: ComputeDevice) -> Self {
        debug!("Translator client at {base_url} ({device})");
        Self {
            client: reqwest::Client::new(),
            base_url,
            device,
        }
    }

    pub fn device(&self) -> ComputeDevice {
        self.device
    }
}

#[async_trait]
impl Translator for RemoteTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        if source == target {
            return Ok(text.to_string());
        }

        let payload: TranslatePayload = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&TranslateRequest {
                text,
                source_lang: source,
                target_lang: target,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| Error::TranslationError(format!("Invalid translation response: {e}")))?;

        Ok(payload.translation.trim().to_string())
    }
}
