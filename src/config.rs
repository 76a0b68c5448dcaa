//! Data-path resolution.
//!
//! The source table location is configuration, never discovered: either the
//! `--data` flag or `EPI_DATA_PATH` (which may live in a `.env` file).

use std::path::PathBuf;

use crate::error::DataSourceError;

pub const DATA_PATH_ENV: &str = "EPI_DATA_PATH";

/// Resolve the data file from the CLI flag, falling back to the environment.
pub fn resolve_data_path(flag: Option<PathBuf>) -> Result<PathBuf, DataSourceError> {
    if flag.is_none() {
        dotenvy::dotenv().ok();
    }
    resolve_data_path_from(flag, std::env::var(DATA_PATH_ENV).ok())
}

/// Pure resolution rule: flag first, then a non-blank environment value.
pub fn resolve_data_path_from(flag: Option<PathBuf>, env_value: Option<String>) -> Result<PathBuf, DataSourceError> {
    if let Some(path) = flag {
        return Ok(path);
    }
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(DataSourceError::NotConfigured)
}
