//! One-shot query with a per-stage breakdown.

use std::path::Path;

use dhwani_core::{AssistantPipeline, PipelineConfig};

pub async fn execute(
    config: PipelineConfig,
    text: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let language = config.language.clone();
    let pipeline = AssistantPipeline::new(config);

    let result = pipeline.process_text(text, &language, output).await;

    println!("Input:        {}", result.native_text);
    println!(
        "English:      {} ({:.1} ms)",
        result.english_text, result.translation_in_time_ms
    );
    if let Some(intent) = &result.intent {
        println!(
            "Intent:       {} ({:.2}) - {}",
            intent.kind, intent.confidence, intent.description
        );
    }
    println!(
        "Reply:        {} ({:.1} ms)",
        result.english_reply, result.chat_time_ms
    );
    println!(
        "Translated:   {} ({:.1} ms)",
        result.native_reply, result.translation_out_time_ms
    );
    if let Some(audio) = &result.audio_output {
        match audio.duration_secs() {
            Some(secs) => println!("Audio:        {secs:.2}s ({:.1} ms)", result.tts_time_ms),
            None => println!("Audio:        saved ({:.1} ms)", result.tts_time_ms),
        }
    }
    println!("Total:        {:.1} ms", result.total_time_ms);

    if !result.success {
        anyhow::bail!(
            "pipeline failed: {}",
            result.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }
    Ok(())
}
