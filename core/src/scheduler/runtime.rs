//! Tokio-backed scheduler

use std::time::Duration;

use tokio::runtime::{Handle, TryCurrentError};
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{OnceTask, RepeatingTask, ScheduleHandle, Scheduler};

/// Runs timer callbacks as tasks on a tokio runtime. Cancelling a handle
/// aborts its task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Use the runtime of the calling context
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn every(&self, period: Duration, mut task: RepeatingTask) -> ScheduleHandle {
        let join = self.runtime.spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                task();
            }
        });

        ScheduleHandle::new(move || join.abort())
    }

    fn after(&self, delay: Duration, task: OnceTask) -> ScheduleHandle {
        let join = self.runtime.spawn(async move {
            time::sleep(delay).await;
            task();
        });

        ScheduleHandle::new(move || join.abort())
    }
}
