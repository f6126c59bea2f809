//! Minimal publish/subscribe
//!
//! Listeners are kept per event key in registration order. Emitting takes a
//! snapshot of the listener list and releases the lock before invoking
//! anything, so listeners may register more listeners or call back into
//! their owner.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A registered listener
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

pub struct EventEmitter<K, E> {
    listeners: Mutex<HashMap<K, Vec<Listener<E>>>>,
}

impl<K, E> Default for EventEmitter<K, E> {
    fn default() -> Self {
        Self {
            listeners: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, E> EventEmitter<K, E>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`
    pub fn on<F>(&self, event: K, listener: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.lock().entry(event).or_default().push(Arc::new(listener));
    }

    /// Call every listener for `event` in registration order.
    ///
    /// A panicking listener is logged and skipped; the rest still run.
    /// Returns the number of listeners that completed.
    pub fn emit(&self, event: K, payload: &E) -> usize {
        self.emit_while(event, payload, || true)
    }

    /// Like `emit`, but checks `live` before each listener and stops
    /// delivering once it returns false. Lets an owner cut delivery short
    /// when a listener (or another thread) invalidates the event.
    pub fn emit_while<F>(&self, event: K, payload: &E, live: F) -> usize
    where
        F: Fn() -> bool,
    {
        let listeners: Vec<Listener<E>> = match self.lock().get(&event) {
            Some(listeners) => listeners.clone(),
            None => return 0,
        };

        let mut completed = 0;
        for listener in listeners {
            if !live() {
                break;
            }
            match panic::catch_unwind(AssertUnwindSafe(|| listener(payload))) {
                Ok(()) => completed += 1,
                Err(_) => tracing::error!(?event, "event listener panicked"),
            }
        }
        completed
    }

    pub fn listener_count(&self, event: K) -> usize {
        self.lock().get(&event).map_or(0, Vec::len)
    }

    pub fn remove_all_listeners(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Vec<Listener<E>>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, E> fmt::Debug for EventEmitter<K, E>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let counts: Vec<(&K, usize)> = listeners.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("EventEmitter")
            .field("listeners", &counts)
            .finish()
    }
}
