use crate::core::error::ParkrankError;
use crate::core::schemas;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub fn db_connect(db_path: &str) -> Result<Connection, ParkrankError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(ParkrankError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(ParkrankError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(ParkrankError::RusqliteError)?;
    Ok(conn)
}

pub fn ladder_db_path(root: &Path) -> PathBuf {
    root.join(schemas::LADDER_DB_NAME)
}

pub fn ladder_events_path(root: &Path) -> PathBuf {
    root.join(schemas::LADDER_EVENTS_NAME)
}

/// Create the data directory and ladder schema. Safe to call repeatedly.
pub fn initialize_ladder_db(root: &Path) -> Result<(), ParkrankError> {
    fs::create_dir_all(root).map_err(ParkrankError::IoError)?;

    let db_path = ladder_db_path(root);
    let conn = db_connect(&db_path.to_string_lossy())?;
    conn.execute_batch(schemas::LADDER_DB_SCHEMA_PARKS)?;
    conn.execute_batch(schemas::LADDER_DB_SCHEMA_OUTCOMES)?;
    conn.execute_batch(schemas::LADDER_DB_INDEX_PARKS_RATING)?;
    conn.execute_batch(schemas::LADDER_DB_INDEX_OUTCOMES_CREATED)?;
    Ok(())
}
