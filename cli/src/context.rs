use std::sync::Arc;

use timr_core::{
    Scheduler, Timer, TimerFactory, TimerId, TimerStore, TimrConfig, TimrConfigExt,
    TokioScheduler,
};
use tokio::sync::RwLock;

/// Holds all shared state for the REPL.
///
/// Timers created here are always kept in `store` so later commands can find
/// them by id.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<TimrConfig>>,
    pub store: TimerStore,
    scheduler: Arc<dyn Scheduler>,
}

impl CliContext {
    /// Must be called from inside a tokio runtime
    pub fn new() -> Result<Self, String> {
        let scheduler = TokioScheduler::current().map_err(|e| e.to_string())?;
        Ok(Self {
            config: Arc::new(RwLock::new(TimrConfig::load())),
            store: TimerStore::new(),
            scheduler: Arc::new(scheduler),
        })
    }

    /// Factory reflecting the current config
    pub async fn factory(&self) -> TimerFactory {
        let config = self.config.read().await;
        TimerFactory::from_config(Arc::clone(&self.scheduler), self.store.clone(), &config)
    }

    pub fn timer(&self, id: u64) -> Result<Timer, String> {
        self.store
            .get(TimerId::from(id))
            .ok_or_else(|| format!("no timer with id {id}"))
    }
}
