//! Error types for display option handling

use thiserror::Error;

/// Errors while building or merging display options
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("expected separator to be a string, instead got: {found}")]
    InvalidSeparator { found: String },

    #[error("expected outputFormat to be: hh:mm:ss, mm:ss (default) or ss; instead got: {found}")]
    InvalidOutputFormat { found: String },

    #[error("expected formatType to be: h, m or s; instead got: {found}")]
    InvalidFormatType { found: String },

    #[error("expected store to be a boolean, instead got: {found}")]
    InvalidStore { found: String },

    #[error("unknown option '{name}'")]
    UnknownOption { name: String },
}
