//! Backend selectors and the supported-language catalog.
//!
//! Backend names and compute targets arrive as strings (config files, CLI
//! flags, env vars) and are parsed into closed enums here; everything past
//! this boundary works with typed selectors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Speech-recognition backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AsrBackend {
    #[default]
    Whisper,
    MetaAsr,
}

impl AsrBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "whisper" => Ok(Self::Whisper),
            "meta-asr" | "meta_asr" | "mms" => Ok(Self::MetaAsr),
            other => Err(Error::UnknownBackend(format!("ASR backend '{other}'"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whisper => "whisper",
            Self::MetaAsr => "meta-asr",
        }
    }
}

impl fmt::Display for AsrBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Speech-recognition model sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsrModelSize {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
    Large,
}

impl AsrModelSize {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "base" => Ok(Self::Base),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(Error::UnknownBackend(format!("ASR model size '{other}'"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Base => "base",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for AsrModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response-generation model sizes (Qwen 2.5 Instruct family).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChatModelSize {
    #[serde(rename = "0.5b")]
    Qwen05B,
    #[default]
    #[serde(rename = "1.5b")]
    Qwen15B,
    #[serde(rename = "3b")]
    Qwen3B,
    #[serde(rename = "7b")]
    Qwen7B,
}

impl ChatModelSize {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "0.5b" => Ok(Self::Qwen05B),
            "1.5b" => Ok(Self::Qwen15B),
            "3b" => Ok(Self::Qwen3B),
            "7b" => Ok(Self::Qwen7B),
            other => Err(Error::UnknownBackend(format!("chat model size '{other}'"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qwen05B => "0.5b",
            Self::Qwen15B => "1.5b",
            Self::Qwen3B => "3b",
            Self::Qwen7B => "7b",
        }
    }

    /// Model identifier advertised to the chat server.
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Qwen05B => "Qwen/Qwen2.5-0.5B-Instruct",
            Self::Qwen15B => "Qwen/Qwen2.5-1.5B-Instruct",
            Self::Qwen3B => "Qwen/Qwen2.5-3B-Instruct",
            Self::Qwen7B => "Qwen/Qwen2.5-7B-Instruct",
        }
    }
}

impl fmt::Display for ChatModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Speech-synthesis backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsBackend {
    #[default]
    Mms,
    Cartesia,
    Indic,
}

impl TtsBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mms" => Ok(Self::Mms),
            "cartesia" => Ok(Self::Cartesia),
            "indic" => Ok(Self::Indic),
            other => Err(Error::UnknownBackend(format!("TTS backend '{other}'"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mms => "mms",
            Self::Cartesia => "cartesia",
            Self::Indic => "indic",
        }
    }

    /// Model identifier advertised to the synthesis server.
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Mms => "facebook/mms-tts",
            Self::Cartesia => "cartesia/sonic",
            Self::Indic => "ai4bharat/indic-parler-tts",
        }
    }
}

impl fmt::Display for TtsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compute target advertised to the model servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    #[default]
    Cuda,
    Cpu,
}

impl ComputeDevice {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cuda" | "gpu" => Ok(Self::Cuda),
            "cpu" => Ok(Self::Cpu),
            other => Err(Error::UnknownBackend(format!("compute target '{other}'"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::Cpu => "cpu",
        }
    }
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported language tags and display names.
const LANGUAGES: &[(&str, &str)] = &[
    ("ml", "Malayalam"),
    ("hi", "Hindi"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("bn", "Bengali"),
    ("mr", "Marathi"),
    ("gu", "Gujarati"),
    ("kn", "Kannada"),
    ("pa", "Punjabi"),
    ("en", "English"),
];

/// Display name for a language tag, if supported.
pub fn language_name(tag: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(code, _)| *code == tag)
        .map(|(_, name)| *name)
}

/// All supported language tags.
pub fn supported_languages() -> impl Iterator<Item = (&'static str, &'static str)> {
    LANGUAGES.iter().copied()
}
