//! Core error types for pomocycle-core.
//!
//! The timer itself has no fatal error conditions. These types cover the
//! places where a host can observe failure: settings storage and the
//! side-effect ports. The engine logs and swallows port errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomocycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A side-effect port failed
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load settings
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save settings
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown settings key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Failure reported by a side-effect port (audio, notification, recorder).
#[derive(Error, Debug)]
pub enum PortError {
    /// Audio backend could not be initialised or refused to play
    #[error("Audio unavailable: {0}")]
    AudioUnavailable(String),

    /// Notification permission was not granted
    #[error("Notification permission denied")]
    PermissionDenied,

    /// Host-side recorder rejected the work record
    #[error("Work recorder failed: {0}")]
    RecorderFailed(String),

    /// Any other host failure
    #[error("{0}")]
    Other(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

impl From<std::io::Error> for PortError {
    fn from(err: std::io::Error) -> Self {
        PortError::Other(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
