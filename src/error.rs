//! Error types for autogoal.
//!
//! [`GoalError`] covers setup and device failures. The inference and
//! recognition paths carry their own tagged errors
//! ([`crate::inference::InferenceError`], [`crate::voice::ListenError`]) so
//! callers can tell a failed request from a real answer.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    /// Audio device or stream error.
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error.
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error.
    #[error("TTS error: {0}")]
    Tts(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, GoalError>;
