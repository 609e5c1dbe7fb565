//! CLI struct definitions for the parkrank command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(
    name = "parkrank",
    version = env!("CARGO_PKG_VERSION"),
    about = "Head-to-head park matchups with an ELO ladder: vote on pairs, watch the rankings move. 🏞️"
)]
pub(crate) struct Cli {
    /// Data directory holding the ladder database (default: ./.parkrank).
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Output format for command results.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create the data directory and ladder database.
    Init,
    /// Bulk-insert a park list into an empty ladder.
    Seed {
        /// JSON file with the park list; defaults to the built-in dataset.
        #[clap(long)]
        file: Option<PathBuf>,
    },
    /// Draw a random matchup of two distinct parks.
    Matchup,
    /// Show the full ladder, best first.
    Rankings,
    /// Show the most recent outcomes, newest first.
    Recent {
        #[clap(long, default_value_t = 3)]
        limit: usize,
    },
    /// Total number of outcomes ever recorded.
    Count,
    /// Record a head-to-head outcome.
    Vote {
        /// Id of the winning park.
        #[clap(long)]
        winner: i64,
        /// Id of the losing park.
        #[clap(long)]
        loser: i64,
    },
}
