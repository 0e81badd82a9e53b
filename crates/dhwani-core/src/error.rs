//! Error types for the Dhwani core crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Engine load error: {0}")]
    EngineLoadError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Translation error: {0}")]
    TranslationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Audio error: {0}")]
    AudioError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
