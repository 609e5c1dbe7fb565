//! Operator configuration from `parkrank.toml`.
//!
//! No config file means defaults — not an error.

use crate::core::elo;
use crate::core::error::ParkrankError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "parkrank.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct ParkrankConfig {
    /// Sensitivity constant for rating updates. Must be positive and finite.
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
    /// Data directory override; the CLI flag wins over this.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_k_factor() -> f64 {
    elo::DEFAULT_K_FACTOR
}

impl Default for ParkrankConfig {
    fn default() -> Self {
        Self {
            k_factor: default_k_factor(),
            data_dir: None,
        }
    }
}

/// Load `parkrank.toml` from `dir` if present, defaults otherwise.
pub fn load_config(dir: &Path) -> Result<ParkrankConfig, ParkrankError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(ParkrankConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(ParkrankError::IoError)?;
    let config: ParkrankConfig = toml::from_str(&content)
        .map_err(|e| ParkrankError::ValidationError(format!("{}: {}", CONFIG_FILE_NAME, e)))?;

    if !config.k_factor.is_finite() || config.k_factor <= 0.0 {
        return Err(ParkrankError::ValidationError(format!(
            "k_factor must be positive and finite, got {}",
            config.k_factor
        )));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempdir().expect("tempdir");
        let config = load_config(tmp.path()).expect("load");
        assert_eq!(config.k_factor, elo::DEFAULT_K_FACTOR);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let tmp = tempdir().expect("tempdir");
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "k_factor = 16.0\ndata_dir = \"ladder-data\"\n",
        )
        .expect("write config");

        let config = load_config(tmp.path()).expect("load");
        assert_eq!(config.k_factor, 16.0);
        assert_eq!(config.data_dir, Some(PathBuf::from("ladder-data")));
    }

    #[test]
    fn non_positive_k_factor_is_rejected() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "k_factor = -4.0\n").expect("write config");
        assert!(matches!(
            load_config(tmp.path()),
            Err(ParkrankError::ValidationError(_))
        ));
    }
}
