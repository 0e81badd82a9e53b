//! Assistant pipeline construction and engine lifecycle.

use std::sync::Arc;

use tracing::info;

use crate::config::PipelineConfig;
use crate::engines::factory;
use crate::engines::{
    language_name, ChatSession, EngineCell, HandleState, SpeechRecognizer, SpeechSynthesizer,
    Translator,
};
use crate::error::Result;
use crate::pipeline::intent::IntentDetector;

/// The assistant pipeline: owns one handle per engine and drives the stage
/// sequence (see the `process` impl).
///
/// Engines load lazily on first use; `load_components` forces them all up
/// front. Stages within one call run strictly sequentially. Concurrent
/// `process` calls are permitted only insofar as the engines themselves
/// tolerate it; the pipeline adds no locking or queueing of its own.
pub struct AssistantPipeline {
    pub(crate) config: PipelineConfig,
    pub(crate) recognizer: EngineCell<dyn SpeechRecognizer>,
    pub(crate) translator: EngineCell<dyn Translator>,
    pub(crate) chat: EngineCell<ChatSession>,
    pub(crate) synthesizer: EngineCell<dyn SpeechSynthesizer>,
    pub(crate) intent: EngineCell<IntentDetector>,
}

impl AssistantPipeline {
    /// Pure configuration; no I/O happens here.
    pub fn new(config: PipelineConfig) -> Self {
        info!(
            "Pipeline configured: ASR={}/{}, chat={}, TTS={}, language={}",
            config.asr_backend,
            config.asr_model_size,
            config.chat_model_size,
            config.tts_backend,
            config.language
        );
        Self {
            config,
            recognizer: EngineCell::new("speech-recognizer"),
            translator: EngineCell::new("translator"),
            chat: EngineCell::new("chat-session"),
            synthesizer: EngineCell::new("speech-synthesizer"),
            intent: EngineCell::new("intent-detector"),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Eagerly construct every engine handle, in a fixed order. Idempotent
    /// per already-loaded handle; construction failures propagate.
    pub async fn load_components(&self) -> Result<()> {
        self.recognizer().await?;
        self.translator().await?;
        self.chat_session().await?;
        self.synthesizer().await?;
        if self.config.detect_intent {
            self.intent_detector().await?;
        }
        info!("All pipeline components loaded");
        Ok(())
    }

    pub async fn recognizer(&self) -> Result<Arc<dyn SpeechRecognizer>> {
        let config = &self.config;
        self.recognizer
            .get_or_init(|| async move { factory::build_recognizer(config) })
            .await
    }

    pub async fn translator(&self) -> Result<Arc<dyn Translator>> {
        let config = &self.config;
        self.translator
            .get_or_init(|| async move { factory::build_translator(config) })
            .await
    }

    pub async fn chat_session(&self) -> Result<Arc<ChatSession>> {
        let config = &self.config;
        self.chat
            .get_or_init(|| async move {
                let engine = factory::build_chat_engine(config)?;
                Ok(Arc::new(ChatSession::new(
                    engine,
                    assistant_system_prompt(&config.language),
                    config.max_history_turns,
                    config.max_new_tokens,
                )))
            })
            .await
    }

    pub async fn synthesizer(&self) -> Result<Arc<dyn SpeechSynthesizer>> {
        let config = &self.config;
        self.synthesizer
            .get_or_init(|| async move { factory::build_synthesizer(config) })
            .await
    }

    pub async fn intent_detector(&self) -> Result<Arc<IntentDetector>> {
        let config = &self.config;
        self.intent
            .get_or_init(|| async move {
                let detector = if config.intent_model_fallback {
                    IntentDetector::with_model_fallback(factory::build_chat_engine(config)?)
                } else {
                    IntentDetector::new()
                };
                Ok(Arc::new(detector))
            })
            .await
    }

    /// Clear the response engine's conversation history. No other state is
    /// touched.
    pub async fn reset_conversation(&self) {
        if let Some(session) = self.chat.get().await {
            session.clear_history().await;
        }
    }

    /// Lifecycle state of every engine handle.
    pub async fn engine_states(&self) -> Vec<(&'static str, HandleState)> {
        vec![
            (self.recognizer.name(), self.recognizer.state().await),
            (self.translator.name(), self.translator.state().await),
            (self.chat.name(), self.chat.state().await),
            (self.synthesizer.name(), self.synthesizer.state().await),
            (self.intent.name(), self.intent.state().await),
        ]
    }

    // Dependency-injection builders, mainly for embedding and tests.

    pub fn with_recognizer(mut self, engine: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = EngineCell::preloaded("speech-recognizer", engine);
        self
    }

    pub fn with_translator(mut self, engine: Arc<dyn Translator>) -> Self {
        self.translator = EngineCell::preloaded("translator", engine);
        self
    }

    pub fn with_chat_session(mut self, session: Arc<ChatSession>) -> Self {
        self.chat = EngineCell::preloaded("chat-session", session);
        self
    }

    pub fn with_synthesizer(mut self, engine: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = EngineCell::preloaded("speech-synthesizer", engine);
        self
    }

    pub fn with_intent_detector(mut self, detector: Arc<IntentDetector>) -> Self {
        self.intent = EngineCell::preloaded("intent-detector", detector);
        self
    }
}

/// System prompt for the conversation session, phrased for the configured
/// target language.
fn assistant_system_prompt(language: &str) -> String {
    if language == "en" {
        return "You are a helpful voice assistant. You provide concise, friendly responses \
suitable for spoken conversation. Keep responses brief (1-3 sentences) and natural. Respond in \
English.\n\nYou can help with:\n- Answering questions\n- Providing information\n- Casual \
conversation\n- Simple tasks\n\nBe conversational and helpful."
            .to_string();
    }

    let name = language_name(language).unwrap_or("the target language");
    format!(
        "You are a helpful voice assistant that speaks {name}. You provide concise, friendly \
responses suitable for spoken conversation. Keep responses brief (1-3 sentences) and natural. \
Respond in English - your response will be translated to {name}.\n\nYou can help with:\n- \
Answering questions\n- Providing information\n- Casual conversation\n- Simple tasks\n\nBe \
conversational and helpful."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_components_marks_every_handle_ready() {
        let pipeline = AssistantPipeline::new(PipelineConfig::default());
        for (_, state) in pipeline.engine_states().await {
            assert_eq!(state, HandleState::Unconfigured);
        }

        // Client construction performs no network I/O.
        pipeline.load_components().await.unwrap();
        for (name, state) in pipeline.engine_states().await {
            assert_eq!(state, HandleState::Ready, "engine '{name}' not ready");
        }
    }

    #[tokio::test]
    async fn load_components_skips_detector_when_disabled() {
        let config = PipelineConfig {
            detect_intent: false,
            ..PipelineConfig::default()
        };
        let pipeline = AssistantPipeline::new(config);
        pipeline.load_components().await.unwrap();
        assert_eq!(pipeline.intent.state().await, HandleState::Unconfigured);
    }

    #[test]
    fn system_prompt_names_the_language() {
        let prompt = assistant_system_prompt("ml");
        assert!(prompt.contains("Malayalam"));
        let prompt = assistant_system_prompt("en");
        assert!(prompt.contains("Respond in English."));
    }
}
