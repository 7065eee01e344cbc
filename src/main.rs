use std::process::ExitCode;

use chrono::Local;
use clap::{CommandFactory, Parser};
use termtimer::{Direction, parse_duration};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
  timer 25s        # 25 seconds
  timer 90         # 90 seconds
  timer 1m50s      # 1 minute 50 seconds
  timer 3h40m50s   # 3 hours 40 minutes 50 seconds
  timer 3:04PM     # until 3:04 PM today (tomorrow if past)
  timer --up 10m   # count up to 10 minutes

Keys: p pause, c continue, Esc or Ctrl-C quit";

#[derive(Debug, Parser)]
#[command(name = "timer", version, about, after_help = EXAMPLES)]
struct Cli {
    /// Duration (`25s`, `1m50s`, bare seconds) or kitchen time (`3:04PM`)
    duration: Option<String>,

    /// Count up from zero instead of down to zero
    #[arg(long)]
    up: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // the clock owns the screen, so logging stays off unless asked for
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(input) = cli.duration else {
        if let Err(err) = Cli::command().print_help() {
            warn!(%err, "failed to print usage");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    let duration = match parse_duration(&input, Local::now().time()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    let direction = if cli.up { Direction::Up } else { Direction::Down };

    match termtimer::run(duration, direction).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
