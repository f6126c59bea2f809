//! Clock string conversion
//!
//! Converts between canonical seconds and `HH:MM:SS` / `MM:SS` / `SS` strings.
//! Input parsing always splits on `:`; the display separator is a formatting
//! concern handled in `display`.

use std::fmt;

use super::TimeError;

/// Largest supported duration: 999:59:59
pub const MAX_SECONDS: u32 = 3_599_999;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * 60;

// ═══════════════════════════════════════════════════════════════════════════
// Canonical Seconds
// ═══════════════════════════════════════════════════════════════════════════

/// A validated duration in whole seconds, always within `0..=MAX_SECONDS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Seconds(u32);

impl Seconds {
    pub const ZERO: Seconds = Seconds(0);
    pub const MAX: Seconds = Seconds(MAX_SECONDS);

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u64> for Seconds {
    type Error = TimeError;

    fn try_from(seconds: u64) -> Result<Self, Self::Error> {
        if seconds > u64::from(MAX_SECONDS) {
            return Err(TimeError::RangeExceeded { seconds });
        }
        Ok(Seconds(seconds as u32))
    }
}

impl From<Seconds> for u64 {
    fn from(seconds: Seconds) -> Self {
        u64::from(seconds.0)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", seconds_to_clock(u64::from(self.0)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Raw Input
// ═══════════════════════════════════════════════════════════════════════════

/// Raw, unvalidated time as supplied by a caller
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    /// Seconds as a number (rounded to the nearest whole second)
    Number(f64),
    /// A clock string or shorthand such as `"5m"`
    Text(String),
}

impl fmt::Display for TimeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInput::Number(n) => write!(f, "{n}"),
            TimeInput::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! time_input_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for TimeInput {
            fn from(value: $ty) -> Self {
                TimeInput::Number(value as f64)
            }
        })*
    };
}

time_input_from_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<f64> for TimeInput {
    fn from(value: f64) -> Self {
        TimeInput::Number(value)
    }
}

impl From<f32> for TimeInput {
    fn from(value: f32) -> Self {
        TimeInput::Number(f64::from(value))
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        TimeInput::Text(value.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> Self {
        TimeInput::Text(value)
    }
}

impl From<Seconds> for TimeInput {
    fn from(value: Seconds) -> Self {
        TimeInput::Number(f64::from(value.get()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════════

/// Parse `SS`, `MM:SS` or `HH:MM:SS` into seconds.
///
/// Every field must be a non-empty run of ASCII digits. In multi-field strings
/// the minutes and seconds fields are bounded to `0..=59`; hours are unbounded.
/// A lone field is a plain seconds count and is not bounded here, the
/// `MAX_SECONDS` ceiling is enforced by `validate`.
pub fn parse_clock_string(input: &str) -> Result<u64, TimeError> {
    let invalid = || TimeError::InvalidFormat {
        input: input.to_string(),
    };

    let fields: Vec<&str> = input.split(':').collect();
    if fields.len() > 3 {
        return Err(invalid());
    }

    let values = fields
        .iter()
        .map(|field| parse_field(field))
        .collect::<Option<Vec<u64>>>()
        .ok_or_else(invalid)?;

    match values.as_slice() {
        [seconds] => Ok(*seconds),
        [minutes, seconds] => {
            if *minutes > 59 || *seconds > 59 {
                return Err(invalid());
            }
            Ok(minutes * SECS_PER_MINUTE + seconds)
        }
        [hours, minutes, seconds] => {
            if *minutes > 59 || *seconds > 59 {
                return Err(invalid());
            }
            Ok(hours
                .saturating_mul(SECS_PER_HOUR)
                .saturating_add(minutes * SECS_PER_MINUTE + seconds))
        }
        _ => Err(invalid()),
    }
}

/// Digits only. Values too large for `u64` saturate so the range check
/// reports them instead of the format check.
fn parse_field(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(field.parse().unwrap_or(u64::MAX))
}

/// True if `input` is a well-formed clock string
pub fn is_correct_format(input: &str) -> bool {
    parse_clock_string(input).is_ok()
}

/// Convert raw input to whole seconds without range checking.
///
/// Numbers are rounded to the nearest second, strings go through
/// `parse_clock_string`.
pub fn round_to_seconds(input: &TimeInput) -> Result<u64, TimeError> {
    match input {
        TimeInput::Number(n) if !n.is_finite() => Err(TimeError::InvalidType {
            found: n.to_string(),
        }),
        TimeInput::Number(n) if *n < 0.0 => Err(TimeError::NegativeTime {
            input: n.to_string(),
        }),
        TimeInput::Number(n) => Ok(n.round() as u64),
        TimeInput::Text(text) => parse_clock_string(text),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Breakdown
// ═══════════════════════════════════════════════════════════════════════════

/// Hours, minutes and seconds of a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Clock {
    pub fn total_seconds(&self) -> u64 {
        self.hours * SECS_PER_HOUR + self.minutes * SECS_PER_MINUTE + self.seconds
    }
}

/// Canonical `HH:MM:SS`, hours widen past two digits as needed
impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

pub fn seconds_to_clock(seconds: u64) -> Clock {
    Clock {
        hours: seconds / SECS_PER_HOUR,
        minutes: (seconds % SECS_PER_HOUR) / SECS_PER_MINUTE,
        seconds: seconds % SECS_PER_MINUTE,
    }
}
