pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "awaybot",
    about = "Awaybot operator CLI",
    long_about = "Inspect Awaybot configuration, run readiness checks, and compute snooze windows offline.",
    after_help = "Examples:\n  awaybot doctor --json\n  awaybot config\n  awaybot snooze --time 17:00 --offset -300"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and outbound endpoint settings")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Compute the snooze window for a spoken time at a UTC offset, offline")]
    Snooze {
        #[arg(long, help = "Local time, HH:MM or a daypart symbol (MO, AF, EV, NI)")]
        time: String,
        #[arg(long, help = "UTC offset of the device location, in minutes")]
        offset: i32,
        #[arg(long, help = "Reference instant, RFC 3339 (defaults to the current time)")]
        now: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Snooze { time, offset, now } => {
            commands::snooze::run(&time, offset, now.as_deref())
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
