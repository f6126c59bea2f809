//! Timer state machine
//!
//! A `Timer` is a cheap cloneable handle onto shared state. Ticks arrive from
//! the timer's `Scheduler`; each tick updates `current_time` under the state
//! lock, then releases it before listeners run. Listeners can therefore call
//! back into the timer (`stop()` from a ticker, `set_start_time()` from a
//! finish). Delivery stops as soon as a listener ends the current run.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──start──▶ Running ──pause──▶ Paused ──start──▶ Running
//!   │  └start_after▶ Pending ──delay──▶ Running
//!   │                Running ──finish/stop──▶ Idle
//!   └──────────── destroy (from any state) ──▶ Destroyed
//! ```
//!
//! Every release of the schedule handle bumps a generation counter, and a
//! tick only applies if it carries the current generation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::TimerError;
use super::store::StoreInner;
use crate::display::{DisplayOptions, OptionsPatch, build_options, format};
use crate::events::EventEmitter;
use crate::scheduler::{ScheduleHandle, Scheduler, TICK_INTERVAL};
use crate::time::{MAX_SECONDS, Seconds, TimeInput, validate};

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

// ═══════════════════════════════════════════════════════════════════════════
// Identity & State Types
// ═══════════════════════════════════════════════════════════════════════════

/// Process-unique timer identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        TimerId(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TimerId {
    fn from(id: u64) -> Self {
        TimerId(id)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Idle,
    /// `start_after` called, waiting for the delay to pass
    Pending,
    Running,
    Paused,
    Destroyed,
}

/// When the first tick happens after `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstTick {
    /// One full interval after start
    #[default]
    AfterInterval,
    /// Synchronously inside `start`, then once per interval
    Immediate,
}

// ═══════════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ticker,
    Finish,
}

/// Payload of a `ticker` event
#[derive(Debug, Clone)]
pub struct Tick {
    pub formatted: String,
    /// `None` for stopwatches
    pub percent_done: Option<u8>,
    pub current_time: u32,
    pub start_time: u32,
    pub timer: Timer,
}

#[derive(Debug, Clone)]
pub enum TimerEvent {
    Tick(Tick),
    Finish(Timer),
}

// ═══════════════════════════════════════════════════════════════════════════
// Timer
// ═══════════════════════════════════════════════════════════════════════════

struct TimerState {
    start_time: Seconds,
    current_time: u32,
    status: TimerStatus,
    options: DisplayOptions,
    first_tick: FirstTick,
    handle: Option<ScheduleHandle>,
    generation: u64,
}

impl TimerState {
    /// Invalidate outstanding ticks and hand back the schedule handle so it
    /// can be dropped outside the lock
    fn release(&mut self) -> Option<ScheduleHandle> {
        self.generation += 1;
        self.handle.take()
    }
}

struct TimerInner {
    id: TimerId,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<TimerState>,
    events: EventEmitter<EventKind, TimerEvent>,
    store: Mutex<Option<Weak<StoreInner>>>,
}

#[derive(Clone)]
pub struct Timer {
    inner: Arc<TimerInner>,
}

impl Timer {
    /// Create an idle timer. A zero `start_time` makes a stopwatch.
    pub fn new(
        start_time: Seconds,
        options: DisplayOptions,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let id = TimerId::next();
        debug!(timer_id = %id, start_time = start_time.get(), "timer created");

        Self {
            inner: Arc::new(TimerInner {
                id,
                scheduler,
                state: Mutex::new(TimerState {
                    start_time,
                    current_time: start_time.get(),
                    status: TimerStatus::Idle,
                    options,
                    first_tick: FirstTick::default(),
                    handle: None,
                    generation: 0,
                }),
                events: EventEmitter::new(),
                store: Mutex::new(None),
            }),
        }
    }

    pub fn id(&self) -> TimerId {
        self.inner.id
    }

    pub fn set_first_tick(&self, first_tick: FirstTick) {
        self.lock_state().first_tick = first_tick;
    }

    // ─── Transitions ────────────────────────────────────────────────────────

    /// Start ticking. Starting a running timer logs a warning and does nothing.
    pub fn start(&self) -> Result<(), TimerError> {
        self.start_after(Duration::ZERO)
    }

    /// Start ticking once `delay` has passed
    pub fn start_after(&self, delay: Duration) -> Result<(), TimerError> {
        let immediate = {
            let mut state = self.lock_state();
            match state.status {
                TimerStatus::Destroyed => return Err(TimerError::Destroyed { id: self.id() }),
                TimerStatus::Running | TimerStatus::Pending => {
                    warn!(timer_id = %self.id(), "timer already running");
                    return Ok(());
                }
                TimerStatus::Idle | TimerStatus::Paused => {}
            }

            if !delay.is_zero() {
                state.status = TimerStatus::Pending;
                state.generation += 1;
                let generation = state.generation;
                let timer = Arc::downgrade(&self.inner);
                state.handle = Some(self.inner.scheduler.after(
                    delay,
                    Box::new(move || {
                        if let Some(inner) = timer.upgrade() {
                            Timer { inner }.resume_pending(generation);
                        }
                    }),
                ));
                debug!(timer_id = %self.id(), delay_ms = delay.as_millis() as u64, "timer start delayed");
                return Ok(());
            }

            self.arm(&mut state)
        };

        if let Some(generation) = immediate {
            self.tick(generation);
        }
        Ok(())
    }

    /// Stop ticking and keep the current time. A countdown that has
    /// already reached zero is stopped instead.
    pub fn pause(&self) {
        let handle = {
            let mut state = self.lock_state();
            if !matches!(state.status, TimerStatus::Running | TimerStatus::Pending) {
                return;
            }
            if !state.start_time.is_zero() && state.current_time == 0 {
                state.status = TimerStatus::Idle;
                state.current_time = state.start_time.get();
            } else {
                state.status = TimerStatus::Paused;
            }
            state.release()
        };
        drop(handle);
        debug!(timer_id = %self.id(), "timer paused");
    }

    /// Stop ticking and reset to the start time
    pub fn stop(&self) {
        let handle = {
            let mut state = self.lock_state();
            if state.status == TimerStatus::Destroyed {
                return;
            }
            state.status = TimerStatus::Idle;
            state.current_time = state.start_time.get();
            state.release()
        };
        drop(handle);
        debug!(timer_id = %self.id(), "timer stopped");
    }

    /// Stop, drop every listener and leave the store. Terminal.
    pub fn destroy(&self) {
        let handle = {
            let mut state = self.lock_state();
            if state.status == TimerStatus::Destroyed {
                return;
            }
            state.status = TimerStatus::Destroyed;
            state.current_time = state.start_time.get();
            state.release()
        };
        drop(handle);

        self.inner.events.remove_all_listeners();

        let store = self.lock_store().take();
        if let Some(store) = store.and_then(|store| store.upgrade()) {
            store.remove(self.id());
        }
        debug!(timer_id = %self.id(), "timer destroyed");
    }

    /// Replace the start time. Stops the timer and returns the newly
    /// formatted time. An invalid time leaves the timer untouched.
    pub fn set_start_time(&self, start_time: impl Into<TimeInput>) -> Result<String, TimerError> {
        let start_time = validate(start_time)?;

        let (formatted, handle) = {
            let mut state = self.lock_state();
            if state.status == TimerStatus::Destroyed {
                return Err(TimerError::Destroyed { id: self.id() });
            }
            let handle = state.release();
            state.status = TimerStatus::Idle;
            state.start_time = start_time;
            state.current_time = start_time.get();
            (format(u64::from(state.current_time), &state.options), handle)
        };
        drop(handle);

        debug!(timer_id = %self.id(), start_time = start_time.get(), "start time changed");
        Ok(formatted)
    }

    /// Merge `patch` over the current display options
    pub fn change_options(&self, patch: &OptionsPatch) -> Result<(), TimerError> {
        let mut state = self.lock_state();
        if state.status == TimerStatus::Destroyed {
            return Err(TimerError::Destroyed { id: self.id() });
        }
        state.options = build_options(patch, Some(&state.options))?;
        Ok(())
    }

    // ─── Listeners ──────────────────────────────────────────────────────────

    /// Register a listener called on every tick
    pub fn ticker<F>(&self, listener: F) -> &Self
    where
        F: Fn(&Tick) + Send + Sync + 'static,
    {
        if self.is_destroyed() {
            warn!(timer_id = %self.id(), "ignoring ticker listener on destroyed timer");
            return self;
        }
        self.inner.events.on(EventKind::Ticker, move |event: &TimerEvent| {
            if let TimerEvent::Tick(tick) = event {
                listener(tick);
            }
        });
        self
    }

    /// Register a listener called when a countdown reaches zero or a
    /// stopwatch passes the ceiling
    pub fn finish<F>(&self, listener: F) -> &Self
    where
        F: Fn(&Timer) + Send + Sync + 'static,
    {
        if self.is_destroyed() {
            warn!(timer_id = %self.id(), "ignoring finish listener on destroyed timer");
            return self;
        }
        self.inner.events.on(EventKind::Finish, move |event: &TimerEvent| {
            if let TimerEvent::Finish(timer) = event {
                listener(timer);
            }
        });
        self
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.events.listener_count(kind)
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    pub fn format_time(&self) -> String {
        let state = self.lock_state();
        format(u64::from(state.current_time), &state.options)
    }

    pub fn current_time(&self) -> u32 {
        self.lock_state().current_time
    }

    pub fn start_time(&self) -> u32 {
        self.lock_state().start_time.get()
    }

    /// `100 - round(current / start * 100)`; `None` for stopwatches
    pub fn percent_done(&self) -> Option<u8> {
        compute_percent(&self.lock_state())
    }

    pub fn status(&self) -> TimerStatus {
        self.lock_state().status
    }

    pub fn is_running(&self) -> bool {
        self.status() == TimerStatus::Running
    }

    pub fn is_destroyed(&self) -> bool {
        self.status() == TimerStatus::Destroyed
    }

    pub fn is_stopwatch(&self) -> bool {
        self.lock_state().start_time.is_zero()
    }

    pub fn options(&self) -> DisplayOptions {
        self.lock_state().options.clone()
    }

    pub fn is_stored(&self) -> bool {
        self.lock_store()
            .as_ref()
            .is_some_and(|store| store.strong_count() > 0)
    }

    // ─── Store Membership ───────────────────────────────────────────────────

    /// Returns the store this timer previously belonged to, if any
    pub(crate) fn attach_store(&self, store: Weak<StoreInner>) -> Option<Weak<StoreInner>> {
        self.lock_store().replace(store)
    }

    pub(crate) fn detach_store(&self) {
        self.lock_store().take();
    }

    // ─── Ticking ────────────────────────────────────────────────────────────

    /// Switch to running and install the recurring tick. Returns the
    /// generation to tick immediately with, if the first-tick policy asks
    /// for it.
    fn arm(&self, state: &mut TimerState) -> Option<u64> {
        state.status = TimerStatus::Running;
        state.generation += 1;
        let generation = state.generation;

        let timer = Arc::downgrade(&self.inner);
        state.handle = Some(self.inner.scheduler.every(
            TICK_INTERVAL,
            Box::new(move || {
                if let Some(inner) = timer.upgrade() {
                    Timer { inner }.tick(generation);
                }
            }),
        ));

        debug!(
            timer_id = %self.id(),
            start_time = state.start_time.get(),
            current_time = state.current_time,
            stopwatch = state.start_time.is_zero(),
            "timer started"
        );

        (state.first_tick == FirstTick::Immediate).then_some(generation)
    }

    fn resume_pending(&self, generation: u64) {
        let immediate = {
            let mut state = self.lock_state();
            if state.status != TimerStatus::Pending || state.generation != generation {
                return;
            }
            self.arm(&mut state)
        };

        if let Some(generation) = immediate {
            self.tick(generation);
        }
    }

    fn tick(&self, generation: u64) {
        let (tick, finished) = {
            let mut state = self.lock_state();
            if state.status != TimerStatus::Running || state.generation != generation {
                return;
            }

            let finished = if state.start_time.is_zero() {
                state.current_time = state.current_time.saturating_add(1);
                state.current_time > MAX_SECONDS
            } else {
                state.current_time = state.current_time.saturating_sub(1);
                state.current_time == 0
            };

            let tick = Tick {
                formatted: format(u64::from(state.current_time), &state.options),
                percent_done: compute_percent(&state),
                current_time: state.current_time,
                start_time: state.start_time.get(),
                timer: self.clone(),
            };
            (tick, finished)
        };

        trace!(timer_id = %self.id(), current_time = tick.current_time, "tick");
        let live = || self.is_live(generation);
        self.inner
            .events
            .emit_while(EventKind::Ticker, &TimerEvent::Tick(tick), live);

        // A ticker listener may have stopped, paused or reconfigured the
        // timer on its final tick
        if finished && live() {
            debug!(timer_id = %self.id(), "timer finished");
            self.inner
                .events
                .emit_while(EventKind::Finish, &TimerEvent::Finish(self.clone()), live);
            self.stop_run(generation);
        }
    }

    /// True while the run that issued `generation` is still the current one
    fn is_live(&self, generation: u64) -> bool {
        let state = self.lock_state();
        state.status == TimerStatus::Running && state.generation == generation
    }

    /// Stop after finishing, unless a finish listener already stopped or
    /// reconfigured the timer
    fn stop_run(&self, generation: u64) {
        let handle = {
            let mut state = self.lock_state();
            if state.generation != generation {
                return;
            }
            state.status = TimerStatus::Idle;
            state.current_time = state.start_time.get();
            state.release()
        };
        drop(handle);
    }

    fn lock_state(&self) -> MutexGuard<'_, TimerState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_store(&self) -> MutexGuard<'_, Option<Weak<StoreInner>>> {
        self.inner.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn force_current_time(&self, current_time: u32) {
        self.lock_state().current_time = current_time;
    }
}

fn compute_percent(state: &TimerState) -> Option<u8> {
    let start = state.start_time.get();
    if start == 0 {
        return None;
    }
    let remaining = (f64::from(state.current_time) / f64::from(start) * 100.0).round();
    Some((100.0 - remaining).clamp(0.0, 100.0) as u8)
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("Timer")
            .field("id", &self.inner.id)
            .field("status", &state.status)
            .field("start_time", &state.start_time.get())
            .field("current_time", &state.current_time)
            .finish()
    }
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Timer {}
