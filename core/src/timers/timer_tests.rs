//! Tests for the timer state machine
//!
//! Every test drives time through a `ManualScheduler`, one tick per second.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{EventKind, FirstTick, Timer, TimerError, TimerStatus, TimerStore};
use crate::display::{DisplayOptions, OptionsPatch};
use crate::scheduler::ManualScheduler;
use crate::time::{MAX_SECONDS, Seconds, TimeError};

fn make_timer(start: u32) -> (ManualScheduler, Timer) {
    let scheduler = ManualScheduler::new();
    let start = Seconds::try_from(u64::from(start)).unwrap();
    let timer = Timer::new(start, DisplayOptions::default(), Arc::new(scheduler.clone()));
    (scheduler, timer)
}

type TickLog = Arc<Mutex<Vec<(String, Option<u8>, u32)>>>;

fn record_ticks(timer: &Timer) -> TickLog {
    let log: TickLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    timer.ticker(move |tick| {
        sink.lock()
            .unwrap()
            .push((tick.formatted.clone(), tick.percent_done, tick.current_time));
    });
    log
}

fn count_finishes(timer: &Timer) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    timer.finish(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    count
}

// ═══════════════════════════════════════════════════════════════════════════
// Countdown
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_countdown_finishes_once_and_resets() {
    let (scheduler, timer) = make_timer(3);
    let finishes = count_finishes(&timer);

    timer.start().unwrap();
    scheduler.ticks(3);

    assert_eq!(finishes.load(Ordering::SeqCst), 1);
    assert!(!timer.is_running());
    assert_eq!(timer.status(), TimerStatus::Idle);
    assert_eq!(timer.current_time(), timer.start_time());
    assert_eq!(scheduler.pending(), 0);

    scheduler.ticks(5);
    assert_eq!(finishes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_countdown_tick_payloads() {
    let (scheduler, timer) = make_timer(3);
    let log = record_ticks(&timer);

    timer.start().unwrap();
    scheduler.ticks(3);

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            ("00:02".to_string(), Some(33), 2),
            ("00:01".to_string(), Some(67), 1),
            ("00:00".to_string(), Some(100), 0),
        ]
    );
}

#[test]
fn test_first_tick_waits_one_interval() {
    let (scheduler, timer) = make_timer(10);
    let log = record_ticks(&timer);

    timer.start().unwrap();
    assert!(log.lock().unwrap().is_empty());

    scheduler.advance(Duration::from_millis(999));
    assert_eq!(timer.current_time(), 10);

    scheduler.advance(Duration::from_millis(1));
    assert_eq!(timer.current_time(), 9);
}

#[test]
fn test_immediate_first_tick() {
    let (scheduler, timer) = make_timer(10);
    timer.set_first_tick(FirstTick::Immediate);
    let log = record_ticks(&timer);

    timer.start().unwrap();
    assert_eq!(timer.current_time(), 9);
    assert_eq!(log.lock().unwrap().len(), 1);

    scheduler.tick();
    assert_eq!(timer.current_time(), 8);
}

#[test]
fn test_countdown_can_run_again_after_finish() {
    let (scheduler, timer) = make_timer(2);
    let finishes = count_finishes(&timer);

    timer.start().unwrap();
    scheduler.ticks(2);
    timer.start().unwrap();
    scheduler.ticks(2);

    assert_eq!(finishes.load(Ordering::SeqCst), 2);
    assert_eq!(timer.current_time(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// Stopwatch
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_stopwatch_counts_up() {
    let (scheduler, timer) = make_timer(0);
    let finishes = count_finishes(&timer);
    let log = record_ticks(&timer);

    timer.start().unwrap();
    scheduler.ticks(75);

    assert_eq!(timer.current_time(), 75);
    assert_eq!(timer.format_time(), "01:15");
    assert_eq!(finishes.load(Ordering::SeqCst), 0);
    assert!(timer.is_running());

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 75);
    assert!(log.iter().all(|(_, percent, _)| percent.is_none()));
}

#[test]
fn test_stopwatch_finishes_past_ceiling() {
    let (scheduler, timer) = make_timer(0);
    let finishes = count_finishes(&timer);

    timer.start().unwrap();
    timer.force_current_time(MAX_SECONDS - 1);

    scheduler.tick();
    assert_eq!(timer.current_time(), MAX_SECONDS);
    assert_eq!(finishes.load(Ordering::SeqCst), 0);

    scheduler.tick();
    assert_eq!(finishes.load(Ordering::SeqCst), 1);
    assert!(!timer.is_running());
    assert_eq!(timer.current_time(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Transitions
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_double_start_keeps_single_tick_source() {
    let (scheduler, timer) = make_timer(10);

    timer.start().unwrap();
    timer.start().unwrap();

    assert_eq!(scheduler.pending(), 1);
    scheduler.tick();
    assert_eq!(timer.current_time(), 9);
}

#[test]
fn test_pause_keeps_current_time() {
    let (scheduler, timer) = make_timer(10);

    timer.start().unwrap();
    scheduler.ticks(3);
    timer.pause();

    assert_eq!(timer.status(), TimerStatus::Paused);
    assert_eq!(scheduler.pending(), 0);

    scheduler.ticks(5);
    assert_eq!(timer.current_time(), 7);

    timer.start().unwrap();
    scheduler.ticks(2);
    assert_eq!(timer.current_time(), 5);
}

#[test]
fn test_pause_when_idle_is_noop() {
    let (_, timer) = make_timer(10);
    timer.pause();
    assert_eq!(timer.status(), TimerStatus::Idle);
}

#[test]
fn test_stop_resets_to_start_time() {
    let (scheduler, timer) = make_timer(10);

    timer.start().unwrap();
    scheduler.ticks(4);
    timer.stop();

    assert_eq!(timer.status(), TimerStatus::Idle);
    assert_eq!(timer.current_time(), 10);
    assert_eq!(scheduler.pending(), 0);

    // idempotent
    timer.stop();
    assert_eq!(timer.current_time(), 10);
}

#[test]
fn test_start_after_delay() {
    let (scheduler, timer) = make_timer(10);

    timer.start_after(Duration::from_millis(500)).unwrap();
    assert_eq!(timer.status(), TimerStatus::Pending);
    assert!(!timer.is_running());

    scheduler.advance(Duration::from_millis(499));
    assert_eq!(timer.status(), TimerStatus::Pending);

    scheduler.advance(Duration::from_millis(1));
    assert!(timer.is_running());
    assert_eq!(timer.current_time(), 10);

    scheduler.tick();
    assert_eq!(timer.current_time(), 9);
}

#[test]
fn test_pause_cancels_pending_start() {
    let (scheduler, timer) = make_timer(10);

    timer.start_after(Duration::from_secs(1)).unwrap();
    timer.pause();
    scheduler.ticks(3);

    assert_eq!(timer.status(), TimerStatus::Paused);
    assert_eq!(timer.current_time(), 10);
    assert_eq!(scheduler.pending(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Reconfiguration
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_set_start_time_stops_and_reformats() {
    let (scheduler, timer) = make_timer(10);

    timer.start().unwrap();
    scheduler.ticks(2);

    assert_eq!(timer.set_start_time("00:30").unwrap(), "00:30");
    assert_eq!(timer.status(), TimerStatus::Idle);
    assert_eq!(timer.start_time(), 30);
    assert_eq!(timer.current_time(), 30);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_set_start_time_rejects_invalid_input() {
    let (scheduler, timer) = make_timer(10);
    timer.start().unwrap();
    scheduler.tick();

    let err = timer.set_start_time("1:99").unwrap_err();
    assert!(matches!(err, TimerError::InvalidTime(TimeError::InvalidFormat { .. })));

    assert!(timer.is_running());
    assert_eq!(timer.start_time(), 10);
    assert_eq!(timer.current_time(), 9);
}

#[test]
fn test_set_start_time_to_zero_makes_stopwatch() {
    let (scheduler, timer) = make_timer(10);

    timer.set_start_time(0).unwrap();
    timer.start().unwrap();
    scheduler.ticks(3);

    assert!(timer.is_stopwatch());
    assert_eq!(timer.current_time(), 3);
    assert_eq!(timer.percent_done(), None);
}

#[test]
fn test_change_options_updates_formatting() {
    let (_, timer) = make_timer(3725);
    assert_eq!(timer.format_time(), "01:02:05");

    let patch = OptionsPatch::new().output_format("ss").format_type("s");
    timer.change_options(&patch).unwrap();
    assert_eq!(timer.format_time(), "3725");

    let patch = OptionsPatch::new().output_format("hh:mm:ss").separator(" ");
    timer.change_options(&patch).unwrap();
    assert_eq!(timer.format_time(), "00 00 3725");
}

#[test]
fn test_change_options_rejects_invalid_patch() {
    let (_, timer) = make_timer(65);
    let before = timer.options();

    let patch = OptionsPatch::new().separator("-").format_type("days");
    assert!(matches!(
        timer.change_options(&patch),
        Err(TimerError::InvalidOption(_))
    ));
    assert_eq!(timer.options(), before);
}

#[test]
fn test_percent_done() {
    let (scheduler, timer) = make_timer(4);
    assert_eq!(timer.percent_done(), Some(0));

    timer.start().unwrap();
    scheduler.tick();
    assert_eq!(timer.percent_done(), Some(25));
    scheduler.tick();
    assert_eq!(timer.percent_done(), Some(50));
}

// ═══════════════════════════════════════════════════════════════════════════
// Destroy
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_destroy_is_terminal() {
    let (scheduler, timer) = make_timer(10);
    let store = TimerStore::new();
    store.add(&timer);
    let log = record_ticks(&timer);
    count_finishes(&timer);

    timer.start().unwrap();
    scheduler.tick();
    timer.destroy();

    assert!(timer.is_destroyed());
    assert_eq!(timer.listener_count(EventKind::Ticker), 0);
    assert_eq!(timer.listener_count(EventKind::Finish), 0);
    assert!(store.is_empty());
    assert!(!timer.is_stored());
    assert_eq!(scheduler.pending(), 0);

    scheduler.ticks(3);
    assert_eq!(log.lock().unwrap().len(), 1);

    let destroyed = TimerError::Destroyed { id: timer.id() };
    assert_eq!(timer.start(), Err(destroyed.clone()));
    assert_eq!(timer.set_start_time(5), Err(destroyed.clone()));
    assert_eq!(
        timer.change_options(&OptionsPatch::new().separator(".")),
        Err(destroyed)
    );

    timer.ticker(|_| {});
    assert_eq!(timer.listener_count(EventKind::Ticker), 0);

    // idempotent
    timer.destroy();
    assert!(timer.is_destroyed());
}

// ═══════════════════════════════════════════════════════════════════════════
// Listeners
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_panicking_listener_is_isolated() {
    let (scheduler, timer) = make_timer(10);
    timer.ticker(|_| panic!("listener failure"));
    let log = record_ticks(&timer);

    timer.start().unwrap();
    scheduler.ticks(2);

    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(timer.current_time(), 8);
    assert!(timer.is_running());
}

#[test]
fn test_stop_from_ticker_listener() {
    let (scheduler, timer) = make_timer(10);
    timer.ticker(|tick| {
        if tick.current_time == 7 {
            tick.timer.stop();
        }
    });

    timer.start().unwrap();
    scheduler.ticks(5);

    assert_eq!(timer.status(), TimerStatus::Idle);
    assert_eq!(timer.current_time(), 10);
}

#[test]
fn test_finish_listener_sees_zero_then_timer_resets() {
    let (scheduler, timer) = make_timer(2);
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    timer.finish(move |t| {
        *sink.lock().unwrap() = Some(t.current_time());
    });

    timer.start().unwrap();
    scheduler.ticks(2);

    assert_eq!(*seen.lock().unwrap(), Some(0));
    assert_eq!(timer.current_time(), 2);
}

#[test]
fn test_finish_listener_may_reconfigure() {
    let (scheduler, timer) = make_timer(2);
    timer.finish(|t| {
        t.set_start_time(5).unwrap();
    });

    timer.start().unwrap();
    scheduler.ticks(2);

    assert_eq!(timer.status(), TimerStatus::Idle);
    assert_eq!(timer.start_time(), 5);
    assert_eq!(timer.current_time(), 5);
}

#[test]
fn test_stop_on_final_tick_suppresses_finish() {
    let (scheduler, timer) = make_timer(3);
    let finishes = count_finishes(&timer);
    timer.ticker(|tick| {
        if tick.current_time == 0 {
            tick.timer.stop();
        }
    });

    timer.start().unwrap();
    scheduler.ticks(3);

    assert_eq!(finishes.load(Ordering::SeqCst), 0);
    assert_eq!(timer.status(), TimerStatus::Idle);
    assert_eq!(timer.current_time(), 3);
}

#[test]
fn test_pause_on_final_tick_does_not_park_at_zero() {
    let (scheduler, timer) = make_timer(2);
    let finishes = count_finishes(&timer);
    let log = record_ticks(&timer);
    timer.ticker(|tick| {
        if tick.current_time == 0 {
            tick.timer.pause();
        }
    });

    timer.start().unwrap();
    scheduler.ticks(2);

    assert_eq!(finishes.load(Ordering::SeqCst), 0);
    assert_eq!(timer.status(), TimerStatus::Idle);
    assert_eq!(timer.current_time(), 2);

    timer.start().unwrap();
    scheduler.tick();

    assert!(timer.is_running());
    assert_eq!(timer.current_time(), 1);
    assert_eq!(log.lock().unwrap().last(), Some(&("00:01".to_string(), Some(50), 1)));
}

#[test]
fn test_set_start_time_on_final_tick_suppresses_finish() {
    let (scheduler, timer) = make_timer(2);
    let finishes = count_finishes(&timer);
    timer.ticker(|tick| {
        if tick.current_time == 0 {
            tick.timer.set_start_time(30).unwrap();
        }
    });

    timer.start().unwrap();
    scheduler.ticks(2);

    assert_eq!(finishes.load(Ordering::SeqCst), 0);
    assert_eq!(timer.status(), TimerStatus::Idle);
    assert_eq!(timer.current_time(), 30);
}

#[test]
fn test_later_listeners_skipped_after_stop() {
    let (scheduler, timer) = make_timer(10);
    timer.ticker(|tick| tick.timer.stop());
    let log = record_ticks(&timer);

    timer.start().unwrap();
    scheduler.tick();

    assert!(log.lock().unwrap().is_empty());
    assert_eq!(timer.current_time(), 10);
}

#[test]
fn test_listeners_chain() {
    let (_, timer) = make_timer(10);
    timer.ticker(|_| {}).ticker(|_| {}).finish(|_| {});

    assert_eq!(timer.listener_count(EventKind::Ticker), 2);
    assert_eq!(timer.listener_count(EventKind::Finish), 1);
}

#[test]
fn test_dropped_timer_stops_ticking() {
    let (scheduler, timer) = make_timer(10);
    timer.start().unwrap();
    drop(timer);

    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.ticks(3), 0);
}
