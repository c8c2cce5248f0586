//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "chamber",
    version,
    about = "Chamber: poker-hand progression with a roulette gamble"
)]
pub struct ChamberCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play an interactive session on stdin
    Play {
        #[arg(long)]
        seed: Option<u64>,
        /// Timer step used to drive the roulette animation phases
        #[arg(long)]
        tick_ms: Option<u64>,
        /// Write the session event journal (JSONL) to this path
        #[arg(long)]
        log: Option<String>,
    },
    /// Autoplay sessions with a greedy strategy and report aggregates
    Sim {
        #[arg(long, default_value_t = 100)]
        games: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Take the roulette on the last hand of a blind that looks lost
        #[arg(long)]
        risk: bool,
    },
    /// Classify 1 to 8 cards (best five above five)
    Eval {
        #[arg(required = true, num_args = 1..)]
        cards: Vec<String>,
    },
    /// Shuffle and deal a single hand
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the resolved configuration with sources
    Cfg,
    /// Sample the seeded generator
    Rng {
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Commands {
    pub const NAMES: &'static [&'static str] = &["play", "sim", "eval", "deal", "cfg", "rng"];
}
