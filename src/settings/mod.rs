//! User settings: interval durations and presentation preferences.
//!
//! This module provides:
//! - [`SettingsStore`]: the live settings, loaded once at startup
//! - [`KeyValueStore`] backends ([`FileStore`], [`MemoryStore`])
//! - [`PendingEdit`] and [`SettingsApplier`]: the draft/commit path
//!
//! # Persisted format
//!
//! ```text
//! time  -> {"pomodoro":25,"shortBreak":5,"longBreak":15}
//! font  -> sans | serif | mono
//! color -> salmon | turquoise | lavender
//! ```
//!
//! Loading never fails. Anything missing or unusable falls back to the
//! default for the affected field only.

mod applier;
mod error;
mod store;

pub use applier::{CommitOutcome, PendingEdit, SettingsApplier};
pub use error::SettingsError;
pub use store::{FileStore, KeyValueStore, MemoryStore, COLOR_KEY, FONT_KEY, TIME_KEY};

use crate::types::{clamp_minutes, AccentColor, Durations, Font, Mode, Preferences};

/// Live settings and the backend they persist to.
pub struct SettingsStore {
    durations: Durations,
    preferences: Preferences,
    backend: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("durations", &self.durations)
            .field("preferences", &self.preferences)
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    /// Loads settings from `backend`, defaulting field by field.
    pub fn load(backend: Box<dyn KeyValueStore>) -> Self {
        let durations = parse_durations(backend.get(TIME_KEY).as_deref());
        let preferences = Preferences {
            font: parse_font(backend.get(FONT_KEY).as_deref()),
            accent_color: parse_color(backend.get(COLOR_KEY).as_deref()),
        };

        tracing::debug!(
            "Loaded settings: {:?}, font={}, color={}",
            durations,
            preferences.font.as_str(),
            preferences.accent_color.as_str()
        );

        Self {
            durations,
            preferences,
            backend,
        }
    }

    /// Creates a store with default settings over an empty in-memory backend.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    pub fn durations(&self) -> &Durations {
        &self.durations
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Length of `mode` in seconds under the live durations.
    pub fn seconds_for(&self, mode: Mode) -> u32 {
        self.durations.seconds(mode)
    }

    /// Replaces the live settings and writes all three keys.
    ///
    /// The in-memory values are updated even if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns the first backend error encountered.
    pub(crate) fn replace(
        &mut self,
        durations: Durations,
        preferences: Preferences,
    ) -> Result<(), SettingsError> {
        self.durations = durations;
        self.preferences = preferences;

        let time = serde_json::to_string(&durations)?;
        let results = [
            self.backend.set(TIME_KEY, &time),
            self.backend.set(FONT_KEY, preferences.font.as_str()),
            self.backend.set(COLOR_KEY, preferences.accent_color.as_str()),
        ];
        results.into_iter().collect()
    }
}

// ============================================================================
// Field parsing
// ============================================================================

/// Parses the `time` value.
///
/// Absent or not a JSON object: all defaults. Otherwise each member is read
/// on its own; a missing or non-integer member takes its default, and an
/// integer member is clamped into range.
fn parse_durations(raw: Option<&str>) -> Durations {
    let defaults = Durations::default();
    let Some(raw) = raw else {
        return defaults;
    };

    let object = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(object)) => object,
        Ok(other) => {
            tracing::warn!("Ignoring non-object '{}' setting: {}", TIME_KEY, other);
            return defaults;
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed '{}' setting: {}", TIME_KEY, e);
            return defaults;
        }
    };

    let mut durations = defaults;
    for mode in Mode::ALL {
        match object.get(mode.as_str()).and_then(serde_json::Value::as_i64) {
            Some(minutes) => *durations.minutes_mut(mode) = clamp_minutes(minutes),
            None => tracing::warn!(
                "Missing or invalid '{}' in '{}' setting, using {}",
                mode.as_str(),
                TIME_KEY,
                defaults.minutes(mode)
            ),
        }
    }
    durations
}

fn parse_font(raw: Option<&str>) -> Font {
    match raw {
        None => Font::default(),
        Some(value) => Font::parse(value).unwrap_or_else(|| {
            tracing::warn!("Ignoring unknown font '{}'", value);
            Font::default()
        }),
    }
}

fn parse_color(raw: Option<&str>) -> AccentColor {
    match raw {
        None => AccentColor::default(),
        Some(value) => AccentColor::parse(value).unwrap_or_else(|| {
            tracing::warn!("Ignoring unknown color '{}'", value);
            AccentColor::default()
        }),
    }
}
