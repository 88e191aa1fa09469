//! Settings persistence error types.
//!
//! Loading never fails; these errors only come from writing a committed
//! edit back to the store, and the caller is expected to degrade gracefully.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings directory could not be created.
    #[error("Failed to create settings directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file could not be written.
    #[error("Failed to write settings file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store contents could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store refuses writes.
    #[error("Settings store is read-only (key '{0}')")]
    ReadOnly(String),
}

impl SettingsError {
    /// Returns true if the error came from the file system.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::CreateDir { .. } | Self::Write { .. })
    }

    /// Returns the file path involved, if any.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::CreateDir { path, .. } | Self::Write { path, .. } => Some(path),
            _ => None,
        }
    }
}
