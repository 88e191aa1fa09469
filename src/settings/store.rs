//! String-keyed persistence backends.
//!
//! The settings layer only needs `get`/`set` on string values. Two backends
//! are provided:
//! - [`FileStore`]: one JSON object on disk, rewritten on every `set`
//! - [`MemoryStore`]: in-process map, for tests and ephemeral runs

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::SettingsError;

/// Key holding the serialized durations object.
pub const TIME_KEY: &str = "time";

/// Key holding the font name.
pub const FONT_KEY: &str = "font";

/// Key holding the accent color name.
pub const COLOR_KEY: &str = "color";

/// Abstract key-value store with string serialization.
pub trait KeyValueStore: Send {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
}

// ============================================================================
// FileStore
// ============================================================================

/// Key-value store backed by a JSON file of string values.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or garbled file is
    /// also treated as empty; it is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::read_entries(&path);
        Self { path, entries }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No settings file at {:?}, using defaults", path);
                return BTreeMap::new();
            }
            Err(e) => {
                tracing::warn!("Could not read settings file {:?}: {}", path, e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Ignoring malformed settings file {:?}: {}", path, e);
                BTreeMap::new()
            }
        }
    }

    fn flush(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;

        // Readers never observe a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| SettingsError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory key-value store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry (builder style).
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Makes every subsequent `set` fail.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        if self.read_only {
            return Err(SettingsError::ReadOnly(key.to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
