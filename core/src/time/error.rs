//! Error types for time conversion and validation

use thiserror::Error;

/// Errors raised while turning user input into canonical seconds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("expected time to be a string or number, instead got: {found}")]
    InvalidType { found: String },

    #[error("expected time format HH:MM:SS, MM:SS or SS, instead got: {input}")]
    InvalidFormat { input: String },

    #[error("expected a non-negative time, instead got: {input}")]
    NegativeTime { input: String },

    #[error("time of {seconds} seconds is over the supported maximum of 999:59:59")]
    RangeExceeded { seconds: u64 },
}
