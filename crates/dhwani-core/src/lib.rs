//! Dhwani Core - Multilingual Voice Assistant Orchestration
//!
//! This crate drives a six-stage conversational pipeline over narrow engine
//! contracts: speech recognition, inbound translation, intent detection,
//! response generation, outbound translation, and speech synthesis.
//!
//! # Architecture
//!
//! - Engine clients speak HTTP to external model servers and are held in
//!   lazily-initialized, state-tracked handles.
//! - One [`AssistantPipeline`] instance owns its engine handles; per-call
//!   stage failures are contained in the returned [`PipelineResult`].
//! - Classified requests can also be routed through a small agent graph
//!   ([`AgentOrchestrator`]) with specialized handlers.
//!
//! # Example
//!
//! ```ignore
//! use dhwani_core::{AssistantPipeline, PipelineConfig};
//!
//! let pipeline = AssistantPipeline::new(PipelineConfig::default());
//! pipeline.load_components().await?;
//!
//! let result = pipeline.process_text("namaskaram", "ml", None).await;
//! println!("{}", result.native_reply);
//! ```

pub mod audio;
pub mod config;
pub mod engines;
pub mod error;
pub mod pipeline;

pub use config::{EndpointConfig, PipelineConfig};
pub use error::{Error, Result};

pub use engines::{
    AsrBackend, AsrModelSize, AudioOutput, ChatEngine, ChatMessage, ChatModelSize, ChatReply,
    ChatSession, ComputeDevice, EngineCell, HandleState, SpeechRecognizer, SpeechSynthesizer,
    Synthesis, Transcription, Translator, TtsBackend,
};

pub use pipeline::{
    AgentIntent, AgentOrchestrator, AgentReply, AssistantPipeline, Intent, IntentDetector,
    IntentKind, PipelineInput, PipelineResult,
};
