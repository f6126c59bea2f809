//! Tick sources
//!
//! Timers never sleep themselves. They ask a `Scheduler` for a recurring
//! callback and hold the returned `ScheduleHandle` for as long as they tick.
//!
//! - **TokioScheduler**: spawns interval tasks on a tokio runtime
//! - **ManualScheduler**: a virtual clock advanced explicitly by the host

mod manual;
mod runtime;

use std::fmt;
use std::time::Duration;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

/// Period between timer ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;
pub type OnceTask = Box<dyn FnOnce() + Send + 'static>;

/// Host facility for deferred and periodic callbacks.
///
/// Implementations must not run the task synchronously from inside `every`
/// or `after`; callers may hold locks while scheduling.
pub trait Scheduler: Send + Sync {
    /// Run `task` every `period`, first after one full period
    fn every(&self, period: Duration, task: RepeatingTask) -> ScheduleHandle;

    /// Run `task` once after `delay`
    fn after(&self, delay: Duration, task: OnceTask) -> ScheduleHandle;
}

/// Exclusive handle to a scheduled task. Cancels the task when cancelled or
/// dropped.
///
/// Cancelling prevents future runs; it does not wait for a run already in
/// progress on another thread. Timers guard against that run with their
/// generation check before each listener.
pub struct ScheduleHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl ScheduleHandle {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for ScheduleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleHandle")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}
