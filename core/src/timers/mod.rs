//! Timer system
//!
//! This module provides:
//! - **Timer**: one countdown/stopwatch state machine and its events
//! - **Store**: an optional shared collection of timers with bulk operations
//! - **Factory**: validated construction with store auto-registration
//!
//! # Modes
//!
//! A timer with a positive start time counts down and finishes at zero.
//! A timer starting at zero is a stopwatch and counts up until the
//! `MAX_SECONDS` ceiling.

mod error;
mod factory;
mod store;
mod timer;

#[cfg(test)]
mod timer_tests;

pub use error::TimerError;
pub use factory::TimerFactory;
pub use store::TimerStore;
pub use timer::{EventKind, FirstTick, Tick, Timer, TimerEvent, TimerId, TimerStatus};
