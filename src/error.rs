//! Error types.
//!
//! Illegal gameplay transitions are not errors: the actor silently rejects
//! them. Errors here cover construction and decoding only.

use crate::combat::state::ActorId;

/// Errors surfaced by actor construction, config loading and script decoding.
#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    /// No rhythm clock was supplied to the actor builder.
    #[error("Rhythm clock unavailable for actor {0}")]
    ClockUnavailable(ActorId),

    /// Config values out of range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Clock published a key that is neither `Miss` nor a timing quality.
    #[error("Unknown timing key {0:?}")]
    UnknownTimingKey(String),

    /// Malformed JSON config or script.
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed binary script.
    #[error("Binary decode failed: {0}")]
    Binary(#[from] bincode::Error),
}

/// Result alias for fallible combat operations.
pub type Result<T> = std::result::Result<T, CombatError>;
