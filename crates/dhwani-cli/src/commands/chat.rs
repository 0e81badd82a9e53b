//! Interactive conversation loop.

use std::io::Write;

use dhwani_core::{AssistantPipeline, PipelineConfig};

pub async fn execute(config: PipelineConfig) -> anyhow::Result<()> {
    let language = config.language.clone();
    let pipeline = AssistantPipeline::new(config);

    println!("Loading pipeline components...");
    pipeline.load_components().await?;
    println!("Ready. Type your queries ('quit' to exit, 'clear' to reset the conversation).");

    let stdin = std::io::stdin();
    loop {
        print!("\n>>> You: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("Goodbye!");
            break;
        }
        if line.eq_ignore_ascii_case("clear") {
            pipeline.reset_conversation().await;
            println!("Conversation cleared.");
            continue;
        }

        let result = pipeline.process_text(line, &language, None).await;
        if !result.success {
            println!("!!! {}", result.error.unwrap_or_default());
            continue;
        }
        if let Some(intent) = &result.intent {
            println!("    [Intent: {} ({:.2})]", intent.kind, intent.confidence);
        }
        println!("<<< Assistant: {}", result.native_reply);
    }

    Ok(())
}
