//! Built-in seed dataset and JSON loading for park imports.
//!
//! The classic U.S. national parks list is baked into the binary at compile
//! time; `seed --file` accepts any JSON document with the same shape. The
//! store is responsible for ids, baseline ratings, and initial ranks — seed
//! data is display metadata only.

use crate::core::error::ParkrankError;
use crate::core::model::NewPark;
use std::fs;
use std::path::Path;

pub const EMBEDDED_PARKS_JSON: &str = include_str!("../../assets/parks.json");

/// The default dataset shipped with the binary.
pub fn default_parks() -> Result<Vec<NewPark>, ParkrankError> {
    parse_parks(EMBEDDED_PARKS_JSON)
}

pub fn load_parks_file(path: &Path) -> Result<Vec<NewPark>, ParkrankError> {
    let content = fs::read_to_string(path).map_err(ParkrankError::IoError)?;
    parse_parks(&content)
}

pub fn parse_parks(json: &str) -> Result<Vec<NewPark>, ParkrankError> {
    let parks: Vec<NewPark> = serde_json::from_str(json)
        .map_err(|e| ParkrankError::ValidationError(format!("invalid park seed JSON: {}", e)))?;
    if parks.len() < 2 {
        return Err(ParkrankError::ValidationError(format!(
            "seed dataset needs at least 2 parks, found {}",
            parks.len()
        )));
    }
    Ok(parks)
}
