//! Speech-to-text command.

use std::path::Path;

use dhwani_core::{AssistantPipeline, PipelineConfig};

pub async fn execute(config: PipelineConfig, file: &Path) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("audio file not found: {}", file.display());
    }

    let language = config.language.clone();
    let pipeline = AssistantPipeline::new(config);
    let recognizer = pipeline.recognizer().await?;
    let transcription = recognizer.transcribe(file, Some(&language)).await?;

    println!("{}", transcription.text);
    eprintln!(
        "[language: {} ({})]",
        transcription.language, transcription.language_name
    );
    Ok(())
}
