//! Settings persistence port.
//!
//! The engine reads settings once at construction and writes them on every
//! update. Any backend works as long as a persist/load pair round-trips the
//! same record.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::settings::Settings;
use crate::error::{ConfigError, CoreError, Result};

pub trait SettingsStore: Send {
    /// Load previously persisted settings, or `None` if nothing was stored.
    fn load(&self) -> Result<Option<Settings>>;

    /// Durably store `settings`.
    fn persist(&self, settings: &Settings) -> Result<()>;
}

/// In-process store. Useful for tests and for embedding hosts that keep
/// preferences elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Settings>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(settings: Settings) -> Self {
        Self {
            slot: Mutex::new(Some(settings)),
        }
    }

    /// The raw stored value, unclamped.
    pub fn stored(&self) -> Result<Option<Settings>> {
        Ok(*self.lock_slot()?)
    }

    fn lock_slot(&self) -> Result<MutexGuard<'_, Option<Settings>>> {
        self.slot
            .lock()
            .map_err(|e| CoreError::Custom(format!("settings slot poisoned: {e}")))
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Settings>> {
        Ok(self.stored()?.map(Settings::clamped))
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        *self.lock_slot()? = Some(*settings);
        Ok(())
    }
}

/// TOML file store, `settings.toml` in the data directory by default.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/settings.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be resolved or created.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(super::data_dir()?.join("settings.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<Option<Settings>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        let table: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let value = serde_json::to_value(table)?;
        Ok(Some(Settings::from_value(&value)))
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        let content = toml::to_string_pretty(settings).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }
}
