pub mod config;
pub mod display;
pub mod events;
pub mod scheduler;
pub mod time;
pub mod timers;

// Re-exports for convenience
pub use config::{ConfigError, TimrConfig, TimrConfigExt};
pub use display::{DisplayOptions, FormatType, OptionError, OptionsPatch, OutputFormat, build_options, format};
pub use scheduler::{ManualScheduler, ScheduleHandle, Scheduler, TokioScheduler};
pub use time::{
    Clock, MAX_SECONDS, Seconds, TimeError, TimeInput, is_correct_format, parse_clock_string,
    round_to_seconds, seconds_to_clock, validate,
};
pub use timers::{
    EventKind, FirstTick, Tick, Timer, TimerError, TimerEvent, TimerFactory, TimerId, TimerStatus,
    TimerStore,
};
