//! Error types for timer operations

use thiserror::Error;

use super::TimerId;
use crate::display::OptionError;
use crate::time::TimeError;

/// Errors from creating or reconfiguring a timer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    #[error(transparent)]
    InvalidOption(#[from] OptionError),

    #[error("timer {id} has been destroyed")]
    Destroyed { id: TimerId },
}
