//! Pipeline stage driver.

use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::pipeline::service::AssistantPipeline;
use crate::pipeline::types::{PipelineInput, PipelineResult};

impl AssistantPipeline {
    /// Run one query through the full stage sequence.
    ///
    /// Per-call stage failures are captured in the returned record; this
    /// method never raises to the caller, so batch callers need no
    /// per-call error handling.
    pub async fn process(
        &self,
        input: PipelineInput,
        output_audio: Option<&Path>,
    ) -> PipelineResult {
        let mut result = PipelineResult::default();
        if let PipelineInput::Audio { path, .. } = &input {
            result.audio_input = Some(path.clone());
        }
        let started = Instant::now();

        match self.run_stages(&mut result, &input, output_audio).await {
            Ok(()) => result.success = true,
            Err(err) => {
                warn!("Pipeline error: {err}");
                result.success = false;
                result.error = Some(err.to_string());
            }
        }

        result.total_time_ms = elapsed_ms(started);
        result
    }

    /// Process text input directly (skips speech recognition).
    pub async fn process_text(
        &self,
        text: &str,
        language: &str,
        output_audio: Option<&Path>,
    ) -> PipelineResult {
        self.process(
            PipelineInput::Text {
                text: text.to_string(),
                language: language.to_string(),
            },
            output_audio,
        )
        .await
    }

    async fn run_stages(
        &self,
        result: &mut PipelineResult,
        input: &PipelineInput,
        output_audio: Option<&Path>,
    ) -> Result<()> {
        let language = input.language().to_string();

        // Stage 1: speech recognition.
        match input {
            PipelineInput::Audio { path, language } => {
                let started = Instant::now();
                let recognizer = self.recognizer().await?;
                let transcription = recognizer.transcribe(path, Some(language)).await?;
                result.native_text = transcription.text;
                result.asr_time_ms = elapsed_ms(started);
                info!("ASR: {}", result.native_text);
            }
            PipelineInput::Text { text, .. } => {
                if text.trim().is_empty() {
                    return Err(Error::InvalidInput(
                        "Either audio or non-empty text must be provided".to_string(),
                    ));
                }
                result.native_text = text.clone();
            }
        }

        // Stage 2: inbound translation (native → English).
        if language != "en" {
            let started = Instant::now();
            let translator = self.translator().await?;
            result.english_text = translator
                .translate(&result.native_text, &language, "en")
                .await?;
            result.translation_in_time_ms = elapsed_ms(started);
            info!("Translation {language}→en: {}", result.english_text);
        } else {
            result.english_text = result.native_text.clone();
        }

        // Stage 3: intent detection. Never fatal to the run.
        if self.config.detect_intent {
            match self.intent_detector().await {
                Ok(detector) => {
                    let intent = detector
                        .detect(&result.native_text, Some(&result.english_text))
                        .await;
                    info!("Intent: {} - {}", intent.kind, intent.description);
                    result.intent = Some(intent);
                }
                Err(err) => warn!("Intent detector unavailable: {err}"),
            }
        }

        // Stage 4: response generation.
        let started = Instant::now();
        let chat = self.chat_session().await?;
        let reply = chat.chat(&result.english_text).await?;
        result.english_reply = reply.content;
        result.chat_time_ms = elapsed_ms(started);
        info!("Reply: {}", result.english_reply);

        // Stage 5: outbound translation (English → native).
        if language != "en" {
            let started = Instant::now();
            let translator = self.translator().await?;
            result.native_reply = translator
                .translate(&result.english_reply, "en", &language)
                .await?;
            result.translation_out_time_ms = elapsed_ms(started);
            info!("Translation en→{language}: {}", result.native_reply);
        } else {
            result.native_reply = result.english_reply.clone();
        }

        // Stage 6: speech synthesis.
        let started = Instant::now();
        let synthesizer = self.synthesizer().await?;
        let synthesis = synthesizer
            .synthesize(&result.native_reply, &language, output_audio)
            .await?;
        result.audio_output = Some(synthesis.audio);
        result.tts_time_ms = elapsed_ms(started);
        info!("Synthesis complete");

        Ok(())
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
