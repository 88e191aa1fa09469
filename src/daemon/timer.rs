//! Timer engine for the pomodoro daemon.
//!
//! This module provides the single owner of all mutable timer state:
//! - One periodic firing per second (`on_tick`)
//! - Pause/resume/restart via `toggle_pause`
//! - The settings draft and its commit
//! - Event publishing for every observable change

use tokio::sync::mpsc;

use crate::engine::{ModeScheduler, TimerClock};
use crate::settings::{CommitOutcome, PendingEdit, SettingsApplier, SettingsStore};
use crate::types::{AccentColor, DurationDelta, Font, Mode, Preferences, TimerSnapshot};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for presentation layers and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed
    Tick {
        /// Remaining seconds
        seconds_left: u32,
    },
    /// An interval expired and another one was entered
    ModeChanged {
        from: Mode,
        to: Mode,
        /// Cycle count after the transition
        cycle_count: u32,
    },
    /// Countdown suspended
    Paused,
    /// Countdown resumed
    Resumed,
    /// Countdown restarted from the hold state
    Restarted,
    /// A long break ended a full set; the timer holds at zero
    CycleCompleted,
    /// A duration commit discarded all progress
    TimerReset,
    /// Font or accent color changed
    PreferencesChanged(Preferences),
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Owns the clock, the settings, and any open settings draft.
pub struct TimerEngine {
    /// Countdown state
    clock: TimerClock,
    /// Live settings
    settings: SettingsStore,
    /// Open settings draft
    pending: Option<PendingEdit>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates a paused engine at the start of a work interval.
    pub fn new(settings: SettingsStore, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        let clock = TimerClock::new(settings.seconds_for(Mode::Work));
        Self {
            clock,
            settings,
            pending: None,
            event_tx,
        }
    }

    /// Performs one periodic firing.
    ///
    /// Paused: nothing happens. Otherwise the countdown drops by one second,
    /// and if that reaches zero the next mode is entered within the same
    /// firing.
    pub fn on_tick(&mut self) {
        if self.clock.is_paused() {
            return;
        }

        if self.clock.seconds_left() == 0 {
            // Only reachable if a zero-length interval was entered.
            self.transition();
            return;
        }

        let expired = self.clock.tick();
        self.emit(TimerEvent::Tick {
            seconds_left: self.clock.seconds_left(),
        });

        if expired {
            self.transition();
        }
    }

    /// Handles interval expiry.
    fn transition(&mut self) {
        let transition = ModeScheduler::advance(&mut self.clock, self.settings.durations());

        tracing::info!(
            "{} -> {} (cycle {})",
            transition.from,
            transition.to,
            self.clock.cycle_count()
        );
        self.emit(TimerEvent::ModeChanged {
            from: transition.from,
            to: transition.to,
            cycle_count: self.clock.cycle_count(),
        });

        if transition.hold {
            tracing::info!("Long break finished, holding for restart");
            self.emit(TimerEvent::CycleCompleted);
        }
    }

    /// Starts, pauses, or restarts the countdown.
    pub fn toggle_pause(&mut self) {
        let restarted = self.clock.toggle_pause(self.settings.seconds_for(Mode::Work));

        if restarted {
            tracing::info!("Restarting after completed cycle");
            self.emit(TimerEvent::Restarted);
        }
        if self.clock.is_paused() {
            tracing::debug!("Paused at {}s", self.clock.seconds_left());
            self.emit(TimerEvent::Paused);
        } else {
            tracing::debug!("Running from {}s", self.clock.seconds_left());
            self.emit(TimerEvent::Resumed);
        }
    }

    // ------------------------------------------------------------------------
    // Settings draft
    // ------------------------------------------------------------------------

    /// Begins a fresh draft from the live settings, replacing any open one.
    pub fn open_settings(&mut self) -> &PendingEdit {
        self.pending.insert(PendingEdit::from_store(&self.settings))
    }

    /// Discards the open draft, if any.
    pub fn cancel_settings(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("Settings draft discarded");
        }
    }

    /// Returns the open draft, opening one if needed.
    fn pending_mut(&mut self) -> &mut PendingEdit {
        let settings = &self.settings;
        self.pending
            .get_or_insert_with(|| PendingEdit::from_store(settings))
    }

    /// Steps one draft duration.
    pub fn edit_pending_duration(&mut self, field: Mode, delta: DurationDelta) -> &PendingEdit {
        let pending = self.pending_mut();
        match delta {
            DurationDelta::Increment => pending.increment(field),
            DurationDelta::Decrement => pending.decrement(field),
        }
        pending
    }

    /// Sets the draft font.
    pub fn edit_pending_font(&mut self, font: Font) -> &PendingEdit {
        let pending = self.pending_mut();
        pending.set_font(font);
        pending
    }

    /// Sets the draft accent color.
    pub fn edit_pending_color(&mut self, color: AccentColor) -> &PendingEdit {
        let pending = self.pending_mut();
        pending.set_color(color);
        pending
    }

    /// Commits the open draft (or the live settings if none is open).
    pub fn commit_settings(&mut self) -> CommitOutcome {
        let edit = self
            .pending
            .take()
            .unwrap_or_else(|| PendingEdit::from_store(&self.settings));

        let outcome = SettingsApplier::commit(&mut self.settings, &mut self.clock, edit);

        if outcome.durations_changed {
            self.emit(TimerEvent::TimerReset);
        }
        if outcome.preferences_changed {
            self.emit(TimerEvent::PreferencesChanged(*self.settings.preferences()));
        }
        outcome
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the presentation snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.clock.snapshot(self.settings.preferences())
    }

    pub fn clock(&self) -> &TimerClock {
        &self.clock
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("Event receiver dropped");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
