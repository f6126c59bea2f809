use std::io::Write;
use std::time::Duration;

use timr_core::{OptionsPatch, Tick, Timer, TimrConfig, TimrConfigExt, build_options};

use crate::CliContext;

fn print_tick(tick: &Tick) {
    match tick.percent_done {
        Some(percent) => println!("[#{}] {} ({percent}%)", tick.timer.id(), tick.formatted),
        None => println!("[#{}] {}", tick.timer.id(), tick.formatted),
    }
}

fn describe(timer: &Timer) -> String {
    let kind = if timer.is_stopwatch() { "stopwatch" } else { "countdown" };
    format!(
        "#{:<4} {:<10} {:<9} {:>12}",
        timer.id(),
        kind,
        format!("{:?}", timer.status()).to_lowercase(),
        timer.format_time()
    )
}

pub async fn new_timer(time: &str, patch: OptionsPatch, ctx: &CliContext) -> Result<(), String> {
    let factory = ctx.factory().await;
    let timer = factory
        .create(time, Some(&patch.store(true)))
        .map_err(|e| e.to_string())?;

    timer
        .ticker(print_tick)
        .finish(|timer| println!("[#{}] finished", timer.id()));

    println!("created {}", describe(&timer));
    Ok(())
}

pub fn list(ctx: &CliContext) {
    let timers = ctx.store.get_all();
    if timers.is_empty() {
        println!("No timers");
        return;
    }

    println!("{:<5} {:<10} {:<9} {:>12}", "Id", "Kind", "Status", "Time");
    println!("{}", "-".repeat(40));
    for timer in &timers {
        println!("{}", describe(timer));
    }
}

pub fn start(id: u64, delay: Option<u64>, ctx: &CliContext) -> Result<(), String> {
    let timer = ctx.timer(id)?;
    let started = match delay {
        Some(secs) => timer.start_after(Duration::from_secs(secs)),
        None => timer.start(),
    };
    started.map_err(|e| e.to_string())
}

pub fn pause(id: u64, ctx: &CliContext) -> Result<(), String> {
    ctx.timer(id)?.pause();
    Ok(())
}

pub fn stop(id: u64, ctx: &CliContext) -> Result<(), String> {
    ctx.timer(id)?.stop();
    Ok(())
}

pub fn destroy(id: u64, ctx: &CliContext) -> Result<(), String> {
    ctx.timer(id)?.destroy();
    println!("destroyed #{id}");
    Ok(())
}

pub fn set_time(id: u64, time: &str, ctx: &CliContext) -> Result<(), String> {
    let formatted = ctx
        .timer(id)?
        .set_start_time(time)
        .map_err(|e| e.to_string())?;
    println!("[#{id}] reset to {formatted}");
    Ok(())
}

pub fn change_options(id: u64, patch: OptionsPatch, ctx: &CliContext) -> Result<(), String> {
    if patch.is_empty() {
        return Err("no options given".to_string());
    }
    let timer = ctx.timer(id)?;
    timer.change_options(&patch).map_err(|e| e.to_string())?;
    println!("{}", describe(&timer));
    Ok(())
}

pub fn start_all(ctx: &CliContext) {
    let started = ctx.store.start_all();
    println!("started {started} timer(s)");
}

pub fn pause_all(ctx: &CliContext) {
    ctx.store.pause_all();
}

pub fn stop_all(ctx: &CliContext) {
    ctx.store.stop_all();
}

pub fn destroy_all(ctx: &CliContext) {
    let count = ctx.store.len();
    ctx.store.destroy_all();
    println!("destroyed {count} timer(s)");
}

pub fn status(ctx: &CliContext) {
    let running: Vec<String> = ctx
        .store
        .running_ids()
        .iter()
        .map(|id| format!("#{id}"))
        .collect();

    println!(
        "{} timer(s), {} running, all running: {}",
        ctx.store.len(),
        running.len(),
        ctx.store.is_running()
    );
    if !running.is_empty() {
        println!("running: {}", running.join(" "));
    }
}

pub async fn show_config(ctx: &CliContext) {
    let factory = ctx.factory().await;
    let defaults = factory.defaults();
    let config = ctx.config.read().await;
    match TimrConfig::config_path() {
        Ok(path) => println!("config file: {}", path.display()),
        Err(e) => println!("config file: unavailable ({e})"),
    }
    println!("  output format:    {}", defaults.output_format);
    println!("  separator:        {:?}", defaults.separator);
    println!("  format type:      {}", defaults.format_type);
    println!("  first tick:       {:?}", config.first_tick);
    println!("  store by default: {}", config.store_by_default);
    if let Some(store) = factory.store() {
        println!("  stored timers:    {}", store.len());
    }
}

/// Update the defaults used for new timers. Existing timers keep their
/// options.
pub async fn set_defaults(patch: OptionsPatch, ctx: &CliContext) -> Result<(), String> {
    let mut config = ctx.config.write().await;
    let display =
        build_options(&patch, Some(&config.display)).map_err(|e| e.to_string())?;
    config.display = display;
    Ok(())
}

pub async fn save_config(ctx: &CliContext) -> Result<(), String> {
    ctx.config.read().await.save().map_err(|e| e.to_string())?;
    println!("configuration saved");
    Ok(())
}

pub fn exit(ctx: &CliContext) {
    ctx.store.destroy_all();
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "quitting...");
    let _ = stdout.flush();
}
