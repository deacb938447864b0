// src/error.rs
use thiserror::Error;

/// Failure taxonomy of a pass. Which variant fired decides how far the pass gets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// Per-source fetch failure. Recorded and tolerated.
    #[error("network error: {0}")]
    Network(String),

    /// Summarization failed; aborts the rest of the pass.
    #[error("AI service error: {0}")]
    AiService(String),

    /// SMTP rejected the credentials.
    #[error("email authentication failed: {0}")]
    Auth(String),

    /// Mail could not be built, delivered, or the connection failed.
    #[error("email transport error: {0}")]
    Transport(String),

    /// Missing or invalid configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    /// True for the variants that abort the remainder of a pass.
    pub fn aborts_pass(&self) -> bool {
        !matches!(self, TrackerError::Network(_))
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TrackerError::Network(format!("timed out: {err}"))
        } else {
            TrackerError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
