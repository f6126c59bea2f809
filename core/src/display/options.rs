//! Display options and the options builder
//!
//! Options are always rebuilt as a whole. Every field of a patch is validated
//! before any of it is merged over the previous set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::OptionError;

// ═══════════════════════════════════════════════════════════════════════════
// Option Types
// ═══════════════════════════════════════════════════════════════════════════

/// Which clock blocks are always rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    /// `HH:MM:SS`
    HoursMinutesSeconds,
    /// `MM:SS`, widening to `HH:MM:SS` once hours are non-zero
    #[default]
    MinutesSeconds,
    /// `SS`
    Seconds,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::HoursMinutesSeconds => "HH:MM:SS",
            OutputFormat::MinutesSeconds => "MM:SS",
            OutputFormat::Seconds => "SS",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HH:MM:SS" => Ok(OutputFormat::HoursMinutesSeconds),
            "MM:SS" => Ok(OutputFormat::MinutesSeconds),
            "SS" => Ok(OutputFormat::Seconds),
            _ => Err(OptionError::InvalidOutputFormat {
                found: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = OptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(value: OutputFormat) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest unit shown; higher units are folded into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormatType {
    #[default]
    Hours,
    /// Hours fold into minutes (`90:00`)
    Minutes,
    /// Everything folds into seconds (`5400`)
    Seconds,
}

impl FormatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::Hours => "h",
            FormatType::Minutes => "m",
            FormatType::Seconds => "s",
        }
    }
}

impl FromStr for FormatType {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h" => Ok(FormatType::Hours),
            "m" => Ok(FormatType::Minutes),
            "s" => Ok(FormatType::Seconds),
            _ => Err(OptionError::InvalidFormatType {
                found: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for FormatType {
    type Error = OptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormatType> for String {
    fn from(value: FormatType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated display configuration for one timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub output_format: OutputFormat,
    pub separator: String,
    pub format_type: FormatType,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::MinutesSeconds,
            separator: ":".to_string(),
            format_type: FormatType::Hours,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Patches
// ═══════════════════════════════════════════════════════════════════════════

/// Unvalidated option overrides. Absent fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsPatch {
    pub output_format: Option<String>,
    pub separator: Option<String>,
    pub format_type: Option<String>,
    /// Per-timer override of the factory's store policy
    pub store: Option<bool>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_format(mut self, value: impl Into<String>) -> Self {
        self.output_format = Some(value.into());
        self
    }

    pub fn separator(mut self, value: impl Into<String>) -> Self {
        self.separator = Some(value.into());
        self
    }

    pub fn format_type(mut self, value: impl Into<String>) -> Self {
        self.format_type = Some(value.into());
        self
    }

    pub fn store(mut self, enabled: bool) -> Self {
        self.store = Some(enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.output_format.is_none()
            && self.separator.is_none()
            && self.format_type.is_none()
            && self.store.is_none()
    }

    /// Build a patch from a loosely-typed TOML table.
    ///
    /// Accepts both `outputFormat` and `output_format` spellings. Unknown keys
    /// are rejected.
    pub fn from_toml(table: &toml::Table) -> Result<Self, OptionError> {
        let mut patch = Self::new();

        for (key, value) in table {
            match key.as_str() {
                "outputFormat" | "output_format" => {
                    let value = value.as_str().ok_or_else(|| OptionError::InvalidOutputFormat {
                        found: value.type_str().to_string(),
                    })?;
                    patch.output_format = Some(value.to_string());
                }
                "separator" => {
                    let value = value.as_str().ok_or_else(|| OptionError::InvalidSeparator {
                        found: value.type_str().to_string(),
                    })?;
                    patch.separator = Some(value.to_string());
                }
                "formatType" | "format_type" => {
                    let value = value.as_str().ok_or_else(|| OptionError::InvalidFormatType {
                        found: value.type_str().to_string(),
                    })?;
                    patch.format_type = Some(value.to_string());
                }
                "store" => {
                    let value = value.as_bool().ok_or_else(|| OptionError::InvalidStore {
                        found: value.type_str().to_string(),
                    })?;
                    patch.store = Some(value);
                }
                _ => {
                    return Err(OptionError::UnknownOption { name: key.clone() });
                }
            }
        }

        Ok(patch)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════

/// Merge `patch` over `previous` (or the defaults when there is none).
pub fn build_options(
    patch: &OptionsPatch,
    previous: Option<&DisplayOptions>,
) -> Result<DisplayOptions, OptionError> {
    let output_format = patch
        .output_format
        .as_deref()
        .map(str::parse::<OutputFormat>)
        .transpose()?;
    let format_type = patch
        .format_type
        .as_deref()
        .map(str::parse::<FormatType>)
        .transpose()?;

    let mut options = previous.cloned().unwrap_or_default();
    if let Some(output_format) = output_format {
        options.output_format = output_format;
    }
    if let Some(format_type) = format_type {
        options.format_type = format_type;
    }
    if let Some(separator) = &patch.separator {
        options.separator = separator.clone();
    }

    Ok(options)
}
