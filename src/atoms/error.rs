// ── dashchat Atoms: Error Types ────────────────────────────────────────────
// Single canonical error enum for the engine, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (I/O, config, provider, channel).
//   • `#[from]` wires std/external error conversions automatically.
//   • No variant carries secret material (API keys) in its message.

use crate::atoms::traits::ProviderError;
use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem, socket or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Config file is not valid TOML for our schema.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP client construction or transport failure (reqwest layer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Text-generation provider failure.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Config is invalid or missing a required value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Web chat bridge failure (bind, handshake, socket).
    #[error("Channel error: {channel}: {message}")]
    Channel { channel: String, message: String },

    /// Catch-all for errors without a dedicated variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl EngineError {
    /// Create a channel error with name and message.
    pub fn channel(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Channel { channel: channel.into(), message: message.into() }
    }
}

// ── String bridges ─────────────────────────────────────────────────────────

impl From<String> for EngineError {
    fn from(s: String) -> Self {
        EngineError::Other(s)
    }
}

impl From<&str> for EngineError {
    fn from(s: &str) -> Self {
        EngineError::Other(s.to_string())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All engine operations return this type.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<EngineError> for String {
    fn from(e: EngineError) -> Self {
        e.to_string()
    }
}
