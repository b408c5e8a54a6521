mod config;

pub use config::{CalendarConfig, Config, PrintConfig, MAX_PRINT_MONTHS, MAX_WINDOW_DAYS};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/medsched[-dev]/` based on MEDSCHED_ENV.
///
/// Set MEDSCHED_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MEDSCHED_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("medsched-dev")
    } else {
        base_dir.join("medsched")
    };

    std::fs::create_dir_all(&dir).map_err(ConfigError::DataDir)?;
    Ok(dir)
}
