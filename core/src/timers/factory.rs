//! Timer construction with shared defaults
//!
//! The factory owns the scheduler every timer ticks on, the display options
//! new timers start from, and the policy for registering them in a store.

use std::sync::Arc;

use super::store::TimerStore;
use super::timer::{FirstTick, Timer};
use super::TimerError;
use crate::config::TimrConfig;
use crate::display::{DisplayOptions, OptionsPatch, build_options};
use crate::scheduler::Scheduler;
use crate::time::{TimeInput, validate};

#[derive(Clone)]
pub struct TimerFactory {
    scheduler: Arc<dyn Scheduler>,
    store: Option<TimerStore>,
    store_by_default: bool,
    defaults: DisplayOptions,
    first_tick: FirstTick,
}

impl TimerFactory {
    /// Factory with no store and default display options
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            store: None,
            store_by_default: false,
            defaults: DisplayOptions::default(),
            first_tick: FirstTick::default(),
        }
    }

    /// Factory seeded from persisted user defaults. Timers are stored in
    /// `store` when the config asks for it.
    pub fn from_config(scheduler: Arc<dyn Scheduler>, store: TimerStore, config: &TimrConfig) -> Self {
        Self::new(scheduler)
            .with_store(store)
            .store_by_default(config.store_by_default)
            .with_defaults(config.display.clone())
            .with_first_tick(config.first_tick)
    }

    pub fn with_store(mut self, store: TimerStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn store_by_default(mut self, enabled: bool) -> Self {
        self.store_by_default = enabled;
        self
    }

    pub fn with_defaults(mut self, defaults: DisplayOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_first_tick(mut self, first_tick: FirstTick) -> Self {
        self.first_tick = first_tick;
        self
    }

    pub fn store(&self) -> Option<&TimerStore> {
        self.store.as_ref()
    }

    pub fn defaults(&self) -> &DisplayOptions {
        &self.defaults
    }

    /// Validate `start`, build options over the factory defaults and create
    /// an idle timer. A zero start time creates a stopwatch.
    ///
    /// `patch.store` overrides the factory's store policy for this timer; it
    /// has no effect when the factory has no store.
    pub fn create(
        &self,
        start: impl Into<TimeInput>,
        patch: Option<&OptionsPatch>,
    ) -> Result<Timer, TimerError> {
        let start = validate(start)?;
        let options = match patch {
            Some(patch) => build_options(patch, Some(&self.defaults))?,
            None => self.defaults.clone(),
        };

        let timer = Timer::new(start, options, Arc::clone(&self.scheduler));
        timer.set_first_tick(self.first_tick);

        let store_it = patch
            .and_then(|p| p.store)
            .unwrap_or(self.store_by_default);
        if store_it {
            if let Some(store) = &self.store {
                store.add(&timer);
            }
        }

        Ok(timer)
    }
}

impl std::fmt::Debug for TimerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerFactory")
            .field("store", &self.store)
            .field("store_by_default", &self.store_by_default)
            .field("defaults", &self.defaults)
            .field("first_tick", &self.first_tick)
            .finish()
    }
}
