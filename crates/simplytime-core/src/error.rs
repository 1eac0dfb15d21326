//! Core error types for simplytime-core.
//!
//! Every failure path in the core degrades to "no-op, keep prior state".
//! These types exist so callers and tests can observe *why* an input was
//! rejected; the [`Session`](crate::session::Session) surface itself
//! swallows them after logging.

use thiserror::Error;

use crate::timer::Mode;

/// Core error type for simplytime-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Duration outside the allowed range for the mode.
    #[error("{mode:?} duration {minutes} min outside allowed range {min}..={max}")]
    DurationOutOfRange {
        mode: Mode,
        minutes: u32,
        min: u32,
        max: u32,
    },

    /// Duration edits are forbidden while the countdown is running.
    #[error("cannot change durations while the timer is running")]
    EditWhileRunning,

    /// Free-form time text that yielded no usable minute value.
    #[error("unparseable time input: {0:?}")]
    UnparseableTime(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
