use rusqlite;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParkrankError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid outcome: {0}")]
    InvalidOutcome(String),
    #[error("Insufficient parks: {0}")]
    InsufficientParks(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
