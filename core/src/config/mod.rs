//! Persisted user defaults
//!
//! Stored as TOML through `confy` under the `timr` app name. A missing or
//! unreadable file falls back to the built-in defaults.

mod error;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

use crate::display::DisplayOptions;
use crate::timers::FirstTick;

const APP_NAME: &str = "timr";
const CONFIG_NAME: &str = "config";

/// Defaults applied to every timer the host creates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimrConfig {
    pub display: DisplayOptions,
    pub first_tick: FirstTick,
    /// Register new timers in the host's store unless a timer opts out
    pub store_by_default: bool,
}

/// Persistence for `TimrConfig`
pub trait TimrConfigExt: Sized {
    /// Load from disk, falling back to defaults on any error
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
}

impl TimrConfigExt for TimrConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)?;
        tracing::debug!("configuration saved");
        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
    }
}
