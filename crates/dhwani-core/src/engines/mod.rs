//! Engine contracts, clients, and lifecycle handles.
//!
//! The heavyweight model engines are external servers; this module holds
//! their narrow call contracts, the HTTP clients that speak to them, and
//! the lazily-initialized handles the pipeline owns.

mod backend;
mod chat;
pub mod factory;
mod handle;
mod recognizer;
mod session;
mod synthesizer;
mod translator;

pub use backend::{
    language_name, supported_languages, AsrBackend, AsrModelSize, ChatModelSize, ComputeDevice,
    TtsBackend,
};
pub use chat::{ChatEngine, ChatMessage, ChatReply, RemoteChatEngine};
pub use handle::{EngineCell, HandleState};
pub use recognizer::{RemoteRecognizer, SpeechRecognizer, Transcription};
pub use session::ChatSession;
pub use synthesizer::{AudioOutput, RemoteSynthesizer, SpeechSynthesizer, Synthesis};
pub use translator::{RemoteTranslator, Translator};
