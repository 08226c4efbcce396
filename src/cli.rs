//! Command-line interface for strictly_hanoi.

use clap::{Parser, Subcommand};
use strictly_hanoi::PegId;

/// Strictly Hanoi - Towers of Hanoi engine with a paced solver
#[derive(Parser, Debug)]
#[command(name = "strictly_hanoi")]
#[command(about = "Towers of Hanoi: plan, watch, or play", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (disk bounds, solver delay)
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the optimal move sequence without playing it
    Plan {
        /// Number of disks
        #[arg(short, long, default_value = "3")]
        disks: usize,

        /// Peg the tower starts on
        #[arg(long, default_value = "left")]
        from: PegId,

        /// Peg the tower should end on
        #[arg(long, default_value = "right")]
        to: PegId,

        /// Print the moves as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch the solver move the tower, one paced step at a time
    Solve {
        /// Number of disks
        #[arg(short, long, default_value = "3")]
        disks: usize,

        /// Peg the tower starts on
        #[arg(long, default_value = "left")]
        from: PegId,

        /// Peg the tower should end on
        #[arg(long, default_value = "right")]
        to: PegId,

        /// Pause between moves in milliseconds (overrides the config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Play by hand, one command per line on stdin
    Play {
        /// Number of disks
        #[arg(short, long, default_value = "3")]
        disks: usize,

        /// Pause between moves when asking the solver to finish (overrides the config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}
