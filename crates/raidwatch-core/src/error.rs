//! Shared error type across raidwatch crates.

use thiserror::Error;

/// Stable error categories (used in logs and assertions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or inconsistent configuration.
    Config,
    /// Unusable key material.
    InvalidKey,
    /// Could not build an outbound frame.
    Encode,
    /// Malformed inbound frame or payload.
    Decode,
    /// Connection-level failure.
    Transport,
    /// The game-side server answered with an `error` field.
    Server,
    /// No response within the request timeout.
    Timeout,
}

impl ErrorKind {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "CONFIG",
            ErrorKind::InvalidKey => "INVALID_KEY",
            ErrorKind::Encode => "ENCODE",
            ErrorKind::Decode => "DECODE",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::Server => "SERVER",
            ErrorKind::Timeout => "TIMEOUT",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RaidwatchError>;

/// Unified error type used by core and relay.
#[derive(Debug, Error)]
pub enum RaidwatchError {
    #[error("config: {0}")]
    Config(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("request timed out")]
    Timeout,
}

impl RaidwatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RaidwatchError::Config(_) => ErrorKind::Config,
            RaidwatchError::InvalidKey(_) => ErrorKind::InvalidKey,
            RaidwatchError::Encode(_) => ErrorKind::Encode,
            RaidwatchError::Decode(_) => ErrorKind::Decode,
            RaidwatchError::Transport(_) => ErrorKind::Transport,
            RaidwatchError::Server(_) => ErrorKind::Server,
            RaidwatchError::Timeout => ErrorKind::Timeout,
        }
    }
}
