mod config;
pub mod database;
pub mod events;
pub mod migrations;
pub mod tasks;

pub use config::{CloudConfig, Config, LoggingConfig, ShareConfig, SyncConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding the database and config file.
///
/// `AGENDA_HOME` wins when set. Otherwise `~/.config/agenda[-dev]/`,
/// with the `-dev` suffix selected by `AGENDA_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("AGENDA_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("AGENDA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("agenda-dev")
            } else {
                base_dir.join("agenda")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
