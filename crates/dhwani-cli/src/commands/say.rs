//! Text-to-speech command.

use std::path::Path;

use dhwani_core::{AssistantPipeline, PipelineConfig};

pub async fn execute(config: PipelineConfig, text: &str, output: &Path) -> anyhow::Result<()> {
    let language = config.language.clone();
    let pipeline = AssistantPipeline::new(config);
    let synthesizer = pipeline.synthesizer().await?;

    let synthesis = synthesizer.synthesize(text, &language, Some(output)).await?;

    match synthesis.audio.duration_secs() {
        Some(secs) => println!("Wrote {} ({secs:.2}s)", output.display()),
        None => println!("Wrote {}", output.display()),
    }
    Ok(())
}
