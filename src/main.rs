//! Scrapper CLI - play arena matches, record them, and replay the decisions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Scrapper - a decision engine for grid territory matches
#[derive(Parser, Debug)]
#[command(name = "scrapper")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a match over stdin/stdout using the arena protocol
    Play {
        /// Record every received snapshot to this match log
        #[arg(short, long)]
        log: Option<std::path::PathBuf>,

        /// Print engine decisions to stderr
        #[arg(short, long)]
        debug: bool,
    },

    /// Replay a recorded match log
    Replay {
        /// Match log file
        #[arg(required = true)]
        log: std::path::PathBuf,

        /// Output format: tui or text
        #[arg(short, long, default_value = "tui")]
        format: cli::ReplayFormat,

        /// Start at a specific turn
        #[arg(short, long)]
        turn: Option<u32>,

        /// Auto-play delay in milliseconds (default: 500)
        #[arg(long, default_value = "500")]
        speed: u64,
    },

    /// Run the engine over generated scenarios and check its bookkeeping
    Validate {
        /// Number of seeds to check (default: 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        seeds: u64,

        /// First seed (increments for each scenario)
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Board width (default: 24)
        #[arg(long, default_value = "24")]
        width: u16,

        /// Board height (default: 12)
        #[arg(long, default_value = "12")]
        height: u16,

        /// Turns to run per seed (default: 20)
        #[arg(short, long, default_value = "20")]
        turns: u32,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Show a progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Play { log, debug } => cli::play::execute(log, debug),
        Commands::Replay {
            log,
            format,
            turn,
            speed,
        } => cli::replay::execute(&log, format, turn, speed),
        Commands::Validate {
            seeds,
            seed,
            width,
            height,
            turns,
            threads,
            progress,
        } => cli::validate::execute(seeds, seed, width, height, turns, threads, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
