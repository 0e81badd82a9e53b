//! End-to-end pipeline tests against mock engines.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use dhwani_core::{
    AssistantPipeline, AudioOutput, ChatEngine, ChatMessage, ChatReply, ChatSession, IntentKind,
    PipelineConfig, PipelineInput, Result, SpeechRecognizer, SpeechSynthesizer, Synthesis,
    Transcription, Translator,
};

struct StaticRecognizer {
    text: &'static str,
    language: &'static str,
    fail: bool,
}

#[async_trait]
impl SpeechRecognizer for StaticRecognizer {
    async fn transcribe(
        &self,
        _audio: &Path,
        _language_hint: Option<&str>,
    ) -> Result<Transcription> {
        if self.fail {
            return Err(dhwani_core::Error::InferenceError(
                "decoder exploded".to_string(),
            ));
        }
        Ok(Transcription {
            text: self.text.to_string(),
            language: self.language.to_string(),
            language_name: "Malayalam".to_string(),
        })
    }
}

struct TaggingTranslator {
    calls: AtomicUsize,
}

impl TaggingTranslator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for TaggingTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{text} [{source}->{target}]"))
    }
}

struct ScriptedChat {
    reply: &'static str,
    fail: bool,
}

#[async_trait]
impl ChatEngine for ScriptedChat {
    async fn chat(&self, _messages: &[ChatMessage], _max_new_tokens: usize) -> Result<ChatReply> {
        if self.fail {
            return Err(dhwani_core::Error::InferenceError(
                "generation failed".to_string(),
            ));
        }
        Ok(ChatReply {
            content: self.reply.to_string(),
            tokens_used: 7,
            generation_time_ms: 2.0,
        })
    }
}

struct SilentSynthesizer {
    fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for SilentSynthesizer {
    async fn synthesize(
        &self,
        _text: &str,
        _language: &str,
        output_path: Option<&Path>,
    ) -> Result<Synthesis> {
        if self.fail {
            return Err(dhwani_core::Error::AudioError("vocoder broke".to_string()));
        }
        if let Some(path) = output_path {
            return Ok(Synthesis {
                audio: AudioOutput::File(path.to_path_buf()),
                sample_rate: 16_000,
            });
        }
        Ok(Synthesis {
            audio: AudioOutput::Samples {
                samples: vec![0.0; 160],
                sample_rate: 16_000,
            },
            sample_rate: 16_000,
        })
    }
}

struct PipelineUnderTest {
    pipeline: AssistantPipeline,
    translator: Arc<TaggingTranslator>,
}

fn build_pipeline(chat_fail: bool, tts_fail: bool) -> PipelineUnderTest {
    let config = PipelineConfig::default();
    let translator = TaggingTranslator::new();
    let chat_engine: Arc<dyn ChatEngine> = Arc::new(ScriptedChat {
        reply: "Hello! I'm doing well.",
        fail: chat_fail,
    });
    let session = Arc::new(ChatSession::new(chat_engine, "test prompt", 10, 256));

    let pipeline = AssistantPipeline::new(config)
        .with_recognizer(Arc::new(StaticRecognizer {
            text: "സുഖമാണോ",
            language: "ml",
            fail: false,
        }))
        .with_translator(translator.clone())
        .with_chat_session(session)
        .with_synthesizer(Arc::new(SilentSynthesizer { fail: tts_fail }));

    PipelineUnderTest {
        pipeline,
        translator,
    }
}

#[tokio::test]
async fn text_input_runs_all_stages() {
    let t = build_pipeline(false, false);
    let result = t.pipeline.process_text("സുഖമാണോ", "ml", None).await;

    assert!(result.success, "unexpected error: {:?}", result.error);
    assert_eq!(result.error, None);
    assert_eq!(result.native_text, "സുഖമാണോ");
    assert_eq!(result.english_text, "സുഖമാണോ [ml->en]");
    assert_eq!(result.english_reply, "Hello! I'm doing well.");
    assert_eq!(result.native_reply, "Hello! I'm doing well. [en->ml]");
    assert!(matches!(
        result.audio_output,
        Some(AudioOutput::Samples { .. })
    ));
    assert_eq!(t.translator.call_count(), 2);
    assert!(result.total_time_ms >= 0.0);
    assert!(result.total_time_ms + 1e-6 >= result.stage_time_sum_ms());
}

#[tokio::test]
async fn audio_input_uses_recognizer() {
    let t = build_pipeline(false, false);
    let result = t
        .pipeline
        .process(
            PipelineInput::Audio {
                path: PathBuf::from("/tmp/query.wav"),
                language: "ml".to_string(),
            },
            None,
        )
        .await;

    assert!(result.success);
    assert_eq!(result.audio_input, Some(PathBuf::from("/tmp/query.wav")));
    assert_eq!(result.native_text, "സുഖമാണോ");
}

#[tokio::test]
async fn english_input_skips_translation_entirely() {
    let t = build_pipeline(false, false);
    let result = t.pipeline.process_text("hello how are you", "en", None).await;

    assert!(result.success);
    assert_eq!(t.translator.call_count(), 0);
    assert_eq!(result.translation_in_time_ms, 0.0);
    assert_eq!(result.translation_out_time_ms, 0.0);
    assert_eq!(result.english_text, "hello how are you");
    assert_eq!(result.native_reply, result.english_reply);
}

#[tokio::test]
async fn intent_is_detected_mid_pipeline() {
    let t = build_pipeline(false, false);
    let result = t.pipeline.process_text("hello how are you", "en", None).await;

    let intent = result.intent.expect("intent should be detected");
    assert_eq!(intent.kind, IntentKind::Greeting);
    assert_eq!(intent.confidence, 0.8);
}

#[tokio::test]
async fn intent_detection_can_be_disabled() {
    let config = PipelineConfig {
        detect_intent: false,
        ..PipelineConfig::default()
    };
    let chat_engine: Arc<dyn ChatEngine> = Arc::new(ScriptedChat {
        reply: "ok",
        fail: false,
    });
    let pipeline = AssistantPipeline::new(config)
        .with_translator(TaggingTranslator::new())
        .with_chat_session(Arc::new(ChatSession::new(chat_engine, "p", 10, 64)))
        .with_synthesizer(Arc::new(SilentSynthesizer { fail: false }));

    let result = pipeline.process_text("hello", "en", None).await;
    assert!(result.success);
    assert!(result.intent.is_none());
}

#[tokio::test]
async fn chat_failure_is_contained_and_partial_record_returned() {
    let t = build_pipeline(true, false);
    let result = t.pipeline.process_text("സുഖമാണോ", "ml", None).await;

    assert!(!result.success);
    let error = result.error.expect("error must be recorded");
    assert!(error.contains("generation failed"), "got: {error}");

    // Stages before the failure are populated...
    assert_eq!(result.native_text, "സുഖമാണോ");
    assert_eq!(result.english_text, "സുഖമാണോ [ml->en]");
    assert!(result.intent.is_some());
    // ...and everything after it is left at defaults.
    assert_eq!(result.english_reply, "");
    assert_eq!(result.native_reply, "");
    assert!(result.audio_output.is_none());
    assert_eq!(result.translation_out_time_ms, 0.0);
    assert_eq!(result.tts_time_ms, 0.0);
    // The inbound translation ran once; the outbound one never did.
    assert_eq!(t.translator.call_count(), 1);
}

#[tokio::test]
async fn synthesis_failure_is_contained() {
    let t = build_pipeline(false, true);
    let result = t.pipeline.process_text("hello", "en", None).await;

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap_or("").contains("vocoder"));
    assert_eq!(result.english_reply, "Hello! I'm doing well.");
    assert!(result.audio_output.is_none());
}

#[tokio::test]
async fn empty_text_input_is_rejected_via_result() {
    let t = build_pipeline(false, false);
    let result = t.pipeline.process_text("   ", "en", None).await;

    assert!(!result.success);
    assert!(result.error.is_some());
    assert_eq!(result.native_text, "");
}

#[tokio::test]
async fn success_and_error_are_mutually_exclusive() {
    for (chat_fail, tts_fail) in [(false, false), (true, false), (false, true)] {
        let t = build_pipeline(chat_fail, tts_fail);
        let result = t.pipeline.process_text("hello", "en", None).await;
        assert_eq!(
            result.success,
            result.error.is_none(),
            "success flag and error field disagree (chat_fail={chat_fail}, tts_fail={tts_fail})"
        );
    }
}

#[tokio::test]
async fn output_path_is_honored() {
    let t = build_pipeline(false, false);
    let out = std::env::temp_dir().join(format!("dhwani-test-{}.wav", uuid::Uuid::new_v4()));
    let result = t.pipeline.process_text("hello", "en", Some(&out)).await;

    assert!(result.success);
    match result.audio_output {
        Some(AudioOutput::File(path)) => assert_eq!(path, out),
        other => panic!("expected file output, got {other:?}"),
    }
}

#[tokio::test]
async fn conversation_reset_clears_history() {
    let t = build_pipeline(false, false);
    t.pipeline.process_text("hello", "en", None).await;
    let session = t.pipeline.chat_session().await.unwrap();
    assert_eq!(session.history_len().await, 2);

    t.pipeline.reset_conversation().await;
    assert_eq!(session.history_len().await, 0);
}
