use std::io::Write;

use clap::{Args, Parser, Subcommand};
use timr_cli::CliContext;
use timr_cli::commands;
use timr_cli::logging;
use timr_cli::readline;
use timr_core::OptionsPatch;

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init();
    let ctx = CliContext::new()?;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "interactive countdown and stopwatch timers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default, PartialEq)]
struct DisplayArgs {
    /// hh:mm:ss, mm:ss or ss
    #[arg(short, long)]
    output_format: Option<String>,
    #[arg(short, long)]
    separator: Option<String>,
    /// h, m or s
    #[arg(short, long)]
    format_type: Option<String>,
}

impl DisplayArgs {
    fn into_patch(self) -> OptionsPatch {
        OptionsPatch {
            output_format: self.output_format,
            separator: self.separator,
            format_type: self.format_type,
            store: None,
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Create a timer. `0` or no time makes a stopwatch.
    New {
        #[arg(default_value = "0")]
        time: String,
        #[command(flatten)]
        display: DisplayArgs,
    },
    List,
    Start {
        id: u64,
        /// Seconds to wait before ticking
        #[arg(short, long)]
        delay: Option<u64>,
    },
    Pause {
        id: u64,
    },
    Stop {
        id: u64,
    },
    Destroy {
        id: u64,
    },
    /// Replace a timer's start time
    Set {
        id: u64,
        time: String,
    },
    /// Change a timer's display options
    Options {
        id: u64,
        #[command(flatten)]
        display: DisplayArgs,
    },
    StartAll,
    PauseAll,
    StopAll,
    DestroyAll,
    Status,
    Config,
    /// Change display defaults for new timers
    Defaults {
        #[command(flatten)]
        display: DisplayArgs,
    },
    SaveConfig,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "timr".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::New { time, display }) => {
            commands::new_timer(&time, display.into_patch(), ctx).await?
        }
        Some(Commands::List) => commands::list(ctx),
        Some(Commands::Start { id, delay }) => commands::start(id, delay, ctx)?,
        Some(Commands::Pause { id }) => commands::pause(id, ctx)?,
        Some(Commands::Stop { id }) => commands::stop(id, ctx)?,
        Some(Commands::Destroy { id }) => commands::destroy(id, ctx)?,
        Some(Commands::Set { id, time }) => commands::set_time(id, &time, ctx)?,
        Some(Commands::Options { id, display }) => {
            commands::change_options(id, display.into_patch(), ctx)?
        }
        Some(Commands::StartAll) => commands::start_all(ctx),
        Some(Commands::PauseAll) => commands::pause_all(ctx),
        Some(Commands::StopAll) => commands::stop_all(ctx),
        Some(Commands::DestroyAll) => commands::destroy_all(ctx),
        Some(Commands::Status) => commands::status(ctx),
        Some(Commands::Config) => commands::show_config(ctx).await,
        Some(Commands::Defaults { display }) => {
            commands::set_defaults(display.into_patch(), ctx).await?
        }
        Some(Commands::SaveConfig) => commands::save_config(ctx).await?,
        Some(Commands::Exit) => {
            commands::exit(ctx);
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
