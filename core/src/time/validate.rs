//! Validation of user-supplied durations
//!
//! Accepts seconds as a number, a clock string, or the `25m` / `2h`
//! shorthand, and produces a range-checked `Seconds`.

use super::{Seconds, TimeError, TimeInput, round_to_seconds};

/// Validate raw input into canonical seconds.
///
/// Shorthand is expanded first, so format and range errors report the
/// expanded form (`"90m"` fails as `"90:00"`).
pub fn validate(input: impl Into<TimeInput>) -> Result<Seconds, TimeError> {
    let input = expand_shorthand(input.into());

    if let TimeInput::Text(text) = &input {
        if text.parse::<f64>().is_ok_and(|number| number < 0.0) {
            return Err(TimeError::NegativeTime {
                input: text.clone(),
            });
        }
    }

    let seconds = round_to_seconds(&input)?;
    Seconds::try_from(seconds)
}

/// Rewrite `<digits>m` to `<digits>:00` and `<digits>h` to `<digits>:00:00`
fn expand_shorthand(input: TimeInput) -> TimeInput {
    let TimeInput::Text(text) = &input else {
        return input;
    };

    let Some(unit) = text.chars().last() else {
        return input;
    };
    let digits = &text[..text.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return input;
    }

    match unit.to_ascii_lowercase() {
        'm' => TimeInput::Text(format!("{digits}:00")),
        'h' => TimeInput::Text(format!("{digits}:00:00")),
        _ => input,
    }
}
