//! Error types for the sequencer

use thiserror::Error;

/// Errors produced while parsing commands or rendering
#[derive(Debug, Error)]
pub enum SequencerError {
    /// Keyframe list is empty or does not fit
    #[error("invalid pattern: {0}")]
    InvalidPattern(&'static str),
    /// Command input is not a valid light command
    #[error("malformed command: {0}")]
    MalformedCommand(#[from] CommandError),
    /// Playback or analysis provider query failed
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Output driver rejected a write or flush
    #[error("render failure: {0}")]
    RenderFailure(String),
}

/// Reasons a command could not be parsed
#[derive(Debug, Error)]
pub enum CommandError {
    /// Input is not JSON at all
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
    /// Top-level `pattern` key is absent
    #[error("missing `pattern` key")]
    MissingPattern,
    /// JSON is valid but keyframes have the wrong shape or range
    #[error("invalid keyframe structure: {0}")]
    Structure(#[source] serde_json::Error),
}
