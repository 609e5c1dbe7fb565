//! Centralized database schema definitions for the ladder store.
//!
//! One SQLite database holds everything:
//! - parks: current ratings and rank fields, mutated only by the store.
//! - outcomes: append-only head-to-head history.

pub const LADDER_DB_NAME: &str = "ladder.db";
pub const LADDER_EVENTS_NAME: &str = "ladder.events.jsonl";

pub const LADDER_DB_SCHEMA_PARKS: &str = "
    CREATE TABLE IF NOT EXISTS parks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        state TEXT NOT NULL,
        description TEXT NOT NULL,
        image TEXT NOT NULL,
        visitors INTEGER NOT NULL,
        established INTEGER NOT NULL,
        size INTEGER NOT NULL,
        tag TEXT,
        rating INTEGER NOT NULL DEFAULT 1500,
        previous_rank INTEGER NOT NULL DEFAULT 0,
        current_rank INTEGER NOT NULL DEFAULT 0
    )
";

pub const LADDER_DB_SCHEMA_OUTCOMES: &str = "
    CREATE TABLE IF NOT EXISTS outcomes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        winner_id INTEGER NOT NULL,
        loser_id INTEGER NOT NULL,
        points INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY(winner_id) REFERENCES parks(id),
        FOREIGN KEY(loser_id) REFERENCES parks(id)
    )
";

pub const LADDER_DB_INDEX_PARKS_RATING: &str =
    "CREATE INDEX IF NOT EXISTS idx_parks_rating ON parks(rating DESC, id ASC)";
pub const LADDER_DB_INDEX_OUTCOMES_CREATED: &str =
    "CREATE INDEX IF NOT EXISTS idx_outcomes_created ON outcomes(created_at DESC, id DESC)";
