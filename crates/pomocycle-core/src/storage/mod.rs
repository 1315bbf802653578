mod settings;
mod store;

pub use settings::{
    Settings, BREAK_MINUTES_MAX, BREAK_MINUTES_MIN, CYCLES_MAX, CYCLES_MIN, FIELD_KEYS,
    WORK_MINUTES_MAX, WORK_MINUTES_MIN,
};
pub use store::{FileStore, MemoryStore, SettingsStore};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the directory that holds persisted settings.
///
/// `POMOCYCLE_HOME` overrides the location outright. Otherwise this is
/// `~/.config/pomocycle[-dev]/`, picked by `POMOCYCLE_ENV`
/// (set `POMOCYCLE_ENV=dev` for the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("POMOCYCLE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("POMOCYCLE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("pomocycle-dev")
            } else {
                base_dir.join("pomocycle")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
