//! Manually advanced scheduler
//!
//! Keeps a virtual clock that only moves when the host calls `advance` or
//! `tick`. Due tasks fire in due-time order (ties in scheduling order), and
//! tasks may schedule or cancel other tasks while they run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{OnceTask, RepeatingTask, ScheduleHandle, Scheduler, TICK_INTERVAL};

/// Smallest period accepted by `every`; a zero period would never let the
/// clock move
const MIN_PERIOD: Duration = Duration::from_millis(1);

enum Task {
    Repeating(RepeatingTask),
    Once(Option<OnceTask>),
}

struct Entry {
    id: u64,
    due: Duration,
    period: Option<Duration>,
    cancelled: Arc<AtomicBool>,
    task: Arc<Mutex<Task>>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of live (not cancelled, not yet fired) tasks
    pub fn pending(&self) -> usize {
        self.lock()
            .entries
            .iter()
            .filter(|e| !e.cancelled.load(Ordering::Acquire))
            .count()
    }

    /// Advance one tick interval. Returns the number of tasks fired.
    pub fn tick(&self) -> usize {
        self.advance(TICK_INTERVAL)
    }

    /// Advance `n` tick intervals. Returns the number of tasks fired.
    pub fn ticks(&self, n: u32) -> usize {
        (0..n).map(|_| self.tick()).sum()
    }

    /// Move the clock forward by `by`, firing everything that falls due.
    /// Returns the number of tasks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut fired = 0;

        loop {
            let task = {
                let mut state = self.lock();
                state.entries.retain(|e| !e.cancelled.load(Ordering::Acquire));

                let Some(entry) = state
                    .entries
                    .iter_mut()
                    .filter(|e| e.due <= target)
                    .min_by_key(|e| (e.due, e.id))
                else {
                    state.now = target;
                    break;
                };

                let due = entry.due;
                match entry.period {
                    Some(period) => entry.due += period,
                    None => entry.cancelled.store(true, Ordering::Release),
                }
                let task = Arc::clone(&entry.task);
                state.now = due;
                task
            };

            let mut task = task.lock().unwrap_or_else(PoisonError::into_inner);
            match &mut *task {
                Task::Repeating(run) => run(),
                Task::Once(run) => {
                    if let Some(run) = run.take() {
                        run();
                    }
                }
            }
            fired += 1;
        }

        fired
    }

    fn schedule(&self, first_due: Duration, period: Option<Duration>, task: Task) -> ScheduleHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            let due = state.now + first_due;
            state.entries.push(Entry {
                id,
                due,
                period,
                cancelled: Arc::clone(&cancelled),
                task: Arc::new(Mutex::new(task)),
            });
        }

        ScheduleHandle::new(move || cancelled.store(true, Ordering::Release))
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn every(&self, period: Duration, task: RepeatingTask) -> ScheduleHandle {
        let period = period.max(MIN_PERIOD);
        self.schedule(period, Some(period), Task::Repeating(task))
    }

    fn after(&self, delay: Duration, task: OnceTask) -> ScheduleHandle {
        self.schedule(delay, None, Task::Once(Some(task)))
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}
