//! parkrank: head-to-head park matchups feeding an ELO ladder.
//!
//! Users compare two parks at a time; every reported outcome updates both
//! parks' ratings through a pure logistic update, recomputes the dense 1..N
//! rank ordering, and lands in an append-only outcome history.
//!
//! # Architecture
//!
//! ## Rating engine
//!
//! [`core::elo`] is pure math: two current ratings in, two new ratings out.
//! Round-half-away-from-zero, independent rounding per delta, no IO.
//!
//! ## Ranking store
//!
//! [`core::store::RankingStore`] is the single seam between the engine and
//! its callers. Two implementations, selected once at construction:
//!
//! - [`core::memory::MemoryStore`]: volatile map behind one mutex
//! - [`core::sqlite::SqliteStore`]: WAL SQLite, mutex-serialized writes in
//!   transactions, fresh read connections, mutation ledger
//!
//! `record_outcome` is one logical transaction: read both ratings at a
//! consistent point, compute, write both, append the record, recompute
//! ranks. A failure at any step leaves no partial state observable.
//!
//! # CLI
//!
//! ```bash
//! # Create and seed a ladder in ./.parkrank
//! parkrank init
//! parkrank seed
//!
//! # Draw a matchup, record the outcome
//! parkrank matchup
//! parkrank vote --winner 3 --loser 7
//!
//! # Watch the ladder move
//! parkrank rankings
//! parkrank recent --limit 5
//! ```

pub mod core;

mod cli;

use crate::core::config;
use crate::core::db;
use crate::core::error::ParkrankError;
use crate::core::model::{Park, RecentOutcome};
use crate::core::output;
use crate::core::seed;
use crate::core::store::{StoreKind, open_store};
use crate::core::time;
use clap::Parser;
use cli::{Cli, Command, OutputFormat};
use colored::Colorize;
use serde_json::Value as JsonValue;
use std::path::PathBuf;

fn to_json<T: serde::Serialize>(value: &T) -> Result<JsonValue, ParkrankError> {
    serde_json::to_value(value)
        .map_err(|e| ParkrankError::ValidationError(format!("encode: {}", e)))
}

pub fn run() -> Result<(), ParkrankError> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let config = config::load_config(&cwd)?;

    let data_dir: PathBuf = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| cwd.join(".parkrank"));

    if let Command::Init = cli.command {
        db::initialize_ladder_db(&data_dir)?;
        println!(
            "Ladder database initialized at {}",
            db::ladder_db_path(&data_dir).display()
        );
        return Ok(());
    }

    let store = open_store(&StoreKind::Sqlite(data_dir), config.k_factor)?;

    match cli.command {
        Command::Init => unreachable!("handled above"),
        Command::Seed { file } => {
            let parks = match file {
                Some(path) => seed::load_parks_file(&path)?,
                None => seed::default_parks()?,
            };
            let count = store.seed_parks(&parks)?;
            match cli.format {
                OutputFormat::Text => println!("Seeded {} parks into the ladder", count),
                OutputFormat::Json => print_envelope("seed", serde_json::json!({"count": count})),
            }
        }
        Command::Matchup => {
            let (first, second) = store.get_random_pair()?;
            match cli.format {
                OutputFormat::Text => {
                    render_contender(&first);
                    println!("{}", "   vs".bold());
                    render_contender(&second);
                }
                OutputFormat::Json => print_envelope(
                    "matchup",
                    serde_json::json!({"parks": [to_json(&first)?, to_json(&second)?]}),
                ),
            }
        }
        Command::Rankings => {
            let parks = store.get_all_ranked()?;
            match cli.format {
                OutputFormat::Text => render_rankings(&parks),
                OutputFormat::Json => {
                    print_envelope("rankings", serde_json::json!({"parks": to_json(&parks)?}))
                }
            }
        }
        Command::Recent { limit } => {
            let outcomes = store.get_recent_outcomes(limit)?;
            match cli.format {
                OutputFormat::Text => render_recent(&outcomes),
                OutputFormat::Json => {
                    print_envelope("recent", serde_json::json!({"outcomes": to_json(&outcomes)?}))
                }
            }
        }
        Command::Count => {
            let count = store.get_outcome_count()?;
            match cli.format {
                OutputFormat::Text => println!("{}", count),
                OutputFormat::Json => print_envelope("count", serde_json::json!({"count": count})),
            }
        }
        Command::Vote { winner, loser } => {
            let outcome = store.record_outcome(winner, loser)?;
            let winner_park = store.get_park(outcome.winner_id)?;
            let loser_park = store.get_park(outcome.loser_id)?;
            match cli.format {
                OutputFormat::Text => {
                    println!(
                        "{} defeated {}: {} points exchanged",
                        winner_park.name.green(),
                        loser_park.name.red(),
                        outcome.points
                    );
                    println!(
                        "  {} now {} (#{}), {} now {} (#{})",
                        winner_park.name,
                        winner_park.rating,
                        winner_park.current_rank,
                        loser_park.name,
                        loser_park.rating,
                        loser_park.current_rank
                    );
                }
                OutputFormat::Json => print_envelope(
                    "vote",
                    serde_json::json!({"outcome": to_json(&outcome)?}),
                ),
            }
        }
    }

    Ok(())
}

fn print_envelope(cmd: &str, extra: JsonValue) {
    println!("{}", time::command_envelope(cmd, "ok", extra));
}

fn render_contender(park: &Park) {
    println!(
        "[{}] {} — {}  (rating {}, rank #{})",
        park.id,
        park.name.bold(),
        park.state,
        park.rating,
        park.current_rank
    );
    println!("     {}", output::one_line(&park.description, 72).dimmed());
}

fn render_rankings(parks: &[Park]) {
    if parks.is_empty() {
        println!("The ladder is empty. Run `parkrank seed` first.");
        return;
    }
    println!(
        "{}",
        format!("{:>4}  {:<26} {:<26} {:>6}  MOVE", "RANK", "PARK", "STATE", "RATING").bold()
    );
    for park in parks {
        println!(
            "{:>4}  {:<26} {:<26} {:>6}  {}",
            park.current_rank,
            park.name,
            park.state,
            park.rating,
            output::movement_marker(park)
        );
    }
}

fn render_recent(outcomes: &[RecentOutcome]) {
    if outcomes.is_empty() {
        println!("No outcomes recorded yet.");
        return;
    }
    for view in outcomes {
        println!(
            "[{}] {} defeated {} (+{}) — {}",
            view.outcome_id,
            view.winner_name.green(),
            view.loser_name.red(),
            view.points,
            view.time_since.dimmed()
        );
    }
}
