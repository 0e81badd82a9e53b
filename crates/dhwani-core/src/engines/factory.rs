//! Engine construction from the configured backend selectors.
//!
//! This is the only place engine clients are built. Construction failures
//! are fatal: there is no degraded mode without the engine.

use std::sync::Arc;

use tracing::info;

use crate::config::PipelineConfig;
use crate::engines::chat::{ChatEngine, RemoteChatEngine};
use crate::engines::recognizer::{RemoteRecognizer, SpeechRecognizer};
use crate::engines::synthesizer::{RemoteSynthesizer, SpeechSynthesizer};
use crate::engines::translator::{RemoteTranslator, Translator};
use crate::error::Result;

pub fn build_recognizer(config: &PipelineConfig) -> Result<Arc<dyn SpeechRecognizer>> {
    let recognizer = RemoteRecognizer::new(
        config.endpoints.asr_url.clone(),
        config.asr_backend,
        config.asr_model_size,
        config.device,
    );
    info!(
        "Constructed {} recognizer ({} / {})",
        config.asr_backend, config.asr_model_size, config.device
    );
    Ok(Arc::new(recognizer))
}

pub fn build_translator(config: &PipelineConfig) -> Result<Arc<dyn Translator>> {
    let translator = RemoteTranslator::new(config.endpoints.translation_url.clone(), config.device);
    info!("Constructed translator ({})", config.device);
    Ok(Arc::new(translator))
}

pub fn build_chat_engine(config: &PipelineConfig) -> Result<Arc<dyn ChatEngine>> {
    let engine = RemoteChatEngine::new(
        config.endpoints.chat_url.clone(),
        config.chat_model_size,
        config.device,
    );
    info!(
        "Constructed chat engine ({} / {})",
        config.chat_model_size, config.device
    );
    Ok(Arc::new(engine))
}

pub fn build_synthesizer(config: &PipelineConfig) -> Result<Arc<dyn SpeechSynthesizer>> {
    let synthesizer = RemoteSynthesizer::new(
        config.endpoints.tts_url.clone(),
        config.tts_backend,
        config.device,
    );
    info!(
        "Constructed {} synthesizer ({})",
        config.tts_backend, config.device
    );
    Ok(Arc::new(synthesizer))
}
