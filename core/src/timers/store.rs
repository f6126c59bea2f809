//! Timer registry
//!
//! Keeps timers by id and applies bulk operations. A timer belongs to at most
//! one store at a time; the timer holds a weak back-reference so `destroy()`
//! can remove itself.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::timer::{Timer, TimerId};

#[derive(Default)]
pub(crate) struct StoreInner {
    timers: Mutex<HashMap<TimerId, Timer>>,
}

impl StoreInner {
    pub(crate) fn remove(&self, id: TimerId) -> Option<Timer> {
        self.lock().remove(&id)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TimerId, Timer>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone, Default)]
pub struct TimerStore {
    inner: Arc<StoreInner>,
}

impl TimerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `timer`, moving it out of any store it was in before.
    /// Destroyed timers are not stored.
    pub fn add(&self, timer: &Timer) -> Timer {
        if timer.is_destroyed() {
            return timer.clone();
        }

        let previous = timer.attach_store(Arc::downgrade(&self.inner));
        if let Some(previous) = previous.and_then(|p| p.upgrade()) {
            if !Arc::ptr_eq(&previous, &self.inner) {
                previous.remove(timer.id());
            }
        }

        self.inner.lock().insert(timer.id(), timer.clone());
        debug!(timer_id = %timer.id(), "timer stored");
        timer.clone()
    }

    pub fn get(&self, id: TimerId) -> Option<Timer> {
        self.inner.lock().get(&id).cloned()
    }

    /// All stored timers, ordered by id
    pub fn get_all(&self) -> Vec<Timer> {
        let mut timers: Vec<Timer> = self.inner.lock().values().cloned().collect();
        timers.sort_by_key(Timer::id);
        timers
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Remove a timer without destroying it. Returns false if it was not
    /// in this store.
    pub fn remove(&self, timer: &Timer) -> bool {
        match self.inner.remove(timer.id()) {
            Some(removed) => {
                removed.detach_store();
                true
            }
            None => false,
        }
    }

    // ─── Bulk Operations ────────────────────────────────────────────────────
    // Each operates on a snapshot so timers can re-enter the store from
    // their listeners.

    /// Start every timer that is not already running. Returns how many
    /// timers were asked to start.
    pub fn start_all(&self) -> usize {
        let timers = self.get_all();
        let mut started = 0;
        for timer in timers.iter().filter(|t| !t.is_running()) {
            if timer.start().is_ok() {
                started += 1;
            }
        }
        started
    }

    pub fn pause_all(&self) {
        self.get_all().iter().for_each(Timer::pause);
    }

    pub fn stop_all(&self) {
        self.get_all().iter().for_each(Timer::stop);
    }

    /// Destroy every timer and empty the store
    pub fn destroy_all(&self) {
        let timers: Vec<Timer> = self.inner.lock().drain().map(|(_, t)| t).collect();
        let count = timers.len();
        for timer in timers {
            timer.destroy();
        }
        debug!(count, "destroyed all stored timers");
    }

    /// True when the store is non-empty and every timer is running
    pub fn is_running(&self) -> bool {
        let timers = self.get_all();
        !timers.is_empty() && timers.iter().all(Timer::is_running)
    }

    pub fn running_ids(&self) -> Vec<TimerId> {
        self.get_all()
            .into_iter()
            .filter(Timer::is_running)
            .map(|t| t.id())
            .collect()
    }
}

impl std::fmt::Debug for TimerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerStore")
            .field("len", &self.len())
            .finish()
    }
}
