//! Pipeline orchestration layer.
//!
//! The canonical request lifecycle: one [`AssistantPipeline`] per
//! deployment drives the six-stage sequence, and the agent graph routes
//! classified requests to specialized handlers.

mod agents;
mod intent;
mod process;
mod service;
mod types;

pub use agents::{AgentIntent, AgentOrchestrator, AgentReply};
pub use intent::{Intent, IntentDetector, IntentKind};
pub use service::AssistantPipeline;
pub use types::{PipelineInput, PipelineResult};
