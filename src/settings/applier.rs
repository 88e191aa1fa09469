//! Draft editing and the single commit path for settings.

use serde::{Deserialize, Serialize};

use super::SettingsStore;
use crate::engine::TimerClock;
use crate::types::{AccentColor, Durations, Font, Mode, Preferences, MAX_MINUTES, MIN_MINUTES};

// ============================================================================
// PendingEdit
// ============================================================================

/// Uncommitted copy of the settings, mutated while the dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    #[serde(rename = "time")]
    pub durations: Durations,
    #[serde(flatten)]
    pub preferences: Preferences,
}

impl PendingEdit {
    /// Starts a draft from the live settings.
    pub fn from_store(store: &SettingsStore) -> Self {
        Self {
            durations: *store.durations(),
            preferences: *store.preferences(),
        }
    }

    /// Adds one minute to `field`; no-op at the maximum.
    pub fn increment(&mut self, field: Mode) {
        let minutes = self.durations.minutes_mut(field);
        if *minutes < MAX_MINUTES {
            *minutes += 1;
        }
    }

    /// Removes one minute from `field`; no-op at the minimum.
    pub fn decrement(&mut self, field: Mode) {
        let minutes = self.durations.minutes_mut(field);
        if *minutes > MIN_MINUTES {
            *minutes -= 1;
        }
    }

    pub fn set_font(&mut self, font: Font) {
        self.preferences.font = font;
    }

    pub fn set_color(&mut self, color: AccentColor) {
        self.preferences.accent_color = color;
    }
}

// ============================================================================
// SettingsApplier
// ============================================================================

/// Result of committing a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    /// Any duration differed, so the timer was reset
    pub durations_changed: bool,
    /// Font or color differed
    pub preferences_changed: bool,
    /// The backend accepted every write
    pub persisted: bool,
}

/// Validates and commits drafts into the live settings.
pub struct SettingsApplier;

impl SettingsApplier {
    /// Commits `edit`.
    ///
    /// Durations are clamped, everything is persisted, and if any duration
    /// differs from the previous live value the clock is reset to a paused
    /// work interval of the new length with the cycle count cleared.
    /// Otherwise the clock is left untouched.
    pub fn commit(
        store: &mut SettingsStore,
        clock: &mut TimerClock,
        edit: PendingEdit,
    ) -> CommitOutcome {
        let durations = edit.durations.clamped();
        let previous_durations = *store.durations();
        let previous_preferences = *store.preferences();

        let persisted = match store.replace(durations, edit.preferences) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Settings applied but not saved: {}", e);
                false
            }
        };

        let durations_changed = durations != previous_durations;
        if durations_changed {
            tracing::info!(
                "Durations changed ({:?} -> {:?}), resetting timer",
                previous_durations,
                durations
            );
            clock.reset(durations.seconds(Mode::Work));
        }

        CommitOutcome {
            durations_changed,
            preferences_changed: edit.preferences != previous_preferences,
            persisted,
        }
    }
}
