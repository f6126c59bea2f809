//! Time conversion and validation
//!
//! - **Clock**: conversion between canonical seconds and clock strings
//! - **Validate**: turning raw user input into range-checked `Seconds`

mod clock;
mod error;
mod validate;

pub use clock::{
    Clock, MAX_SECONDS, Seconds, TimeInput, is_correct_format, parse_clock_string,
    round_to_seconds, seconds_to_clock,
};
pub use error::TimeError;
pub use validate::validate;
