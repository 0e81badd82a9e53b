//! Intent inspection command.

use dhwani_core::{AgentOrchestrator, IntentDetector};

pub async fn execute(text: &str) -> anyhow::Result<()> {
    let detector = IntentDetector::new();
    let intent = detector.detect(text, None).await;

    println!("Intent:      {}", intent.kind);
    println!("Confidence:  {:.2}", intent.confidence);
    println!("Description: {}", intent.description);
    println!("Agent route: {}", AgentOrchestrator::classify(text));
    Ok(())
}
