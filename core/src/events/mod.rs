//! Event dispatch
//!
//! A small keyed publish/subscribe primitive. Timers own one emitter each
//! and publish `ticker` and `finish` events through it.

mod emitter;

pub use emitter::{EventEmitter, Listener};
