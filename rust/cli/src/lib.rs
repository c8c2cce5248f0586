//! # Chamber CLI Library
//!
//! Command-line front end for the `chamber-engine` progression game: build a poker
//! hand that meets the round's requirement, grow the multiplier, clear three blinds
//! per round, and optionally bet the run on the roulette.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["chamber", "play", "--seed", "42"];
//! let code = chamber_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Interactive session on stdin, optionally journaled to JSONL
//! - `sim`: Greedy autoplay over many seeded sessions
//! - `eval`: Classify a set of cards
//! - `deal`: Deal a single hand for inspection
//! - `cfg`: Display the resolved configuration and where each value came from
//! - `rng`: Sample the seeded generator

#[macro_use]
mod macros;

use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;

pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{ChamberCli, Commands};
use commands::{
    handle_cfg_command, handle_deal_command, handle_eval_command, handle_play_command,
    handle_rng_command, handle_sim_command,
};

pub use error::CliError;

/// Environment variable holding the tracing filter directive (e.g. `chamber_engine=debug`).
pub const ENV_LOG: &str = "CHAMBER_LOG";

/// Installs the stderr tracing subscriber. Defaults to `warn` when [`ENV_LOG`] is unset
/// or invalid; a second call is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand handler.
///
/// # Arguments
///
/// * `args` - Iterator over command-line arguments (typically `std::env::args()`)
/// * `out` - Output stream for normal output (typically `stdout`)
/// * `err` - Output stream for error messages (typically `stderr`)
///
/// # Returns
///
/// Exit code: [`exit_code::SUCCESS`] or [`exit_code::ERROR`]
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["chamber", "deal", "--seed", "42"];
/// let code = chamber_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match ChamberCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "Chamber CLI");
                    write_or_exit!(err, "Usage: chamber <command> [options]\n");
                    write_or_exit!(err, "Commands:");
                    for c in Commands::NAMES {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: chamber --help");
                    exit_code::ERROR
                }
            };
        }
    };

    let result = match cli.cmd {
        Commands::Play { seed, tick_ms, log } => {
            // Real stdin; works for both a TTY and piped input
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(seed, tick_ms, log, out, err, &mut stdin_lock)
        }
        Commands::Sim { games, seed, risk } => handle_sim_command(games, seed, risk, out, err),
        Commands::Eval { cards } => handle_eval_command(&cards, out, err),
        Commands::Deal { seed } => handle_deal_command(seed, out),
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Rng { seed } => handle_rng_command(seed, out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}
