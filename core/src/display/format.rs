//! Rendering seconds as display strings

use super::{DisplayOptions, FormatType, OutputFormat};

/// Render `seconds` according to `options`.
///
/// `format_type` picks the largest unit (higher units fold into it),
/// `output_format` picks which blocks are shown. `SS` shows the seconds
/// component only.
pub fn format(seconds: u64, options: &DisplayOptions) -> String {
    let (hours, minutes, secs) = match options.format_type {
        FormatType::Hours => (seconds / 3600, (seconds % 3600) / 60, seconds % 60),
        FormatType::Minutes => (0, seconds / 60, seconds % 60),
        FormatType::Seconds => (0, 0, seconds),
    };

    let blocks = match options.output_format {
        OutputFormat::HoursMinutesSeconds => vec![hours, minutes, secs],
        OutputFormat::MinutesSeconds if hours > 0 => vec![hours, minutes, secs],
        OutputFormat::MinutesSeconds => vec![minutes, secs],
        OutputFormat::Seconds => vec![secs],
    };

    blocks
        .iter()
        .map(|&n| zero_pad(n))
        .collect::<Vec<_>>()
        .join(&options.separator)
}

/// Two digits minimum, wider values untouched
fn zero_pad(n: u64) -> String {
    format!("{n:02}")
}
