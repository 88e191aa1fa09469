//! Countdown primitive.
//!
//! `TimerClock` owns the remaining seconds, the pause flag, and the cycle
//! counter. It advances by exactly one second per [`TimerClock::tick`] and
//! knows how to present itself as a [`TimerSnapshot`].

use serde::{Deserialize, Serialize};

use super::cycle::CycleCounter;
use crate::types::{two_digits, ActionLabel, Mode, Preferences, TimerSnapshot};

/// Countdown state for the active mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerClock {
    /// Active mode
    mode: Mode,
    /// Remaining seconds in the active mode
    seconds_left: u32,
    /// Whether ticking is suspended
    is_paused: bool,
    /// Length of the active mode captured when it was entered
    entry_seconds: u32,
    /// Short breaks entered since the last restart
    cycles: CycleCounter,
}

impl TimerClock {
    /// Creates a paused clock at the start of a work interval.
    pub fn new(work_seconds: u32) -> Self {
        Self {
            mode: Mode::Work,
            seconds_left: work_seconds,
            is_paused: true,
            entry_seconds: work_seconds,
            cycles: CycleCounter::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycles.count()
    }

    /// Length of the active interval as captured on entry.
    pub fn entry_seconds(&self) -> u32 {
        self.entry_seconds
    }

    /// Returns true while parked at zero after a completed long-break cycle.
    pub fn is_holding(&self) -> bool {
        self.is_paused && self.mode == Mode::Work && self.cycles.is_complete()
    }

    /// Decrements the countdown by one second.
    ///
    /// Must only be called while running with time left. Returns true when
    /// this tick brought the countdown to zero.
    pub fn tick(&mut self) -> bool {
        debug_assert!(!self.is_paused, "tick while paused");
        debug_assert!(self.seconds_left > 0, "tick at zero");
        self.seconds_left = self.seconds_left.saturating_sub(1);
        self.seconds_left == 0
    }

    /// Flips the pause flag.
    ///
    /// From the hold state this first restarts the work interval with
    /// `work_seconds` and clears the cycle counter. Returns true when such a
    /// restart happened.
    pub fn toggle_pause(&mut self, work_seconds: u32) -> bool {
        let restart = self.is_holding();
        if restart {
            self.seconds_left = work_seconds;
            self.entry_seconds = work_seconds;
            self.cycles.reset();
        }
        self.is_paused = !self.is_paused;
        restart
    }

    /// Enters `mode` with a fresh countdown. The pause flag is kept.
    pub(crate) fn enter(&mut self, mode: Mode, seconds: u32) {
        self.mode = mode;
        self.seconds_left = seconds;
        self.entry_seconds = seconds;
    }

    /// Parks the clock at zero, paused.
    pub(crate) fn hold(&mut self) {
        self.is_paused = true;
        self.seconds_left = 0;
    }

    /// Discards all progress and returns to a paused work interval.
    pub(crate) fn reset(&mut self, work_seconds: u32) {
        self.enter(Mode::Work, work_seconds);
        self.is_paused = true;
        self.cycles.reset();
    }

    pub(crate) fn cycles_mut(&mut self) -> &mut CycleCounter {
        &mut self.cycles
    }

    /// Remaining share of the active interval, 0..=100.
    pub fn percentage(&self) -> f64 {
        if self.is_holding() || self.entry_seconds == 0 {
            return 100.0;
        }
        f64::from(self.seconds_left) / f64::from(self.entry_seconds) * 100.0
    }

    /// Label for the start/pause button.
    pub fn action_label(&self) -> ActionLabel {
        if !self.is_paused {
            ActionLabel::Pause
        } else if self.cycles.is_complete() && self.mode == Mode::Work {
            ActionLabel::Restart
        } else {
            ActionLabel::Start
        }
    }

    /// Builds the presentation snapshot.
    pub fn snapshot(&self, preferences: &Preferences) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            minutes: two_digits(self.seconds_left / 60),
            seconds: two_digits(self.seconds_left % 60),
            percentage: self.percentage(),
            action_label: self.action_label(),
            accent_color: preferences.accent_color,
            font: preferences.font,
            seconds_left: self.seconds_left,
            is_paused: self.is_paused,
            cycle_count: self.cycles.count(),
        }
    }
}
