//! Display configuration and clock formatting
//!
//! - **Options**: validated `DisplayOptions` and the patch/merge builder
//! - **Format**: rendering canonical seconds as clock strings

mod error;
mod format;
mod options;

pub use error::OptionError;
pub use format::format;
pub use options::{DisplayOptions, FormatType, OptionsPatch, OutputFormat, build_options};
