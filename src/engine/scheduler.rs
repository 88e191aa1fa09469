//! Mode scheduler: decides what follows an expired interval.
//!
//! | current    | cycle count | next       | cycle effect |
//! |------------|-------------|------------|--------------|
//! | Work       | any         | ShortBreak | +1           |
//! | ShortBreak | < 4         | Work       | none         |
//! | ShortBreak | 4           | LongBreak  | none         |
//! | LongBreak  | 4           | Work, hold | none         |
//! | LongBreak  | < 4         | Work       | reset        |
//!
//! The ShortBreak routing reads the count as it was after the previous
//! increment, so the fourth short break leads straight into the long break.
//! A long break that ends a full set parks the clock at zero, paused, until
//! the user restarts it; the counter is cleared by that restart.

use super::clock::TimerClock;
use crate::types::{Durations, Mode, CYCLES_PER_LONG_BREAK};

/// What happens to the cycle counter on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEffect {
    None,
    Increment,
    Reset,
}

/// A planned mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Mode that was active
    pub from: Mode,
    /// Mode being entered
    pub to: Mode,
    /// Effect on the cycle counter
    pub cycle_effect: CycleEffect,
    /// Whether the new interval is parked at zero awaiting restart
    pub hold: bool,
}

/// Stateless transition table over [`Mode`].
pub struct ModeScheduler;

impl ModeScheduler {
    /// Plans the transition out of `current` given the cycle count.
    pub fn plan(current: Mode, cycle_count: u32) -> Transition {
        assert!(
            cycle_count <= CYCLES_PER_LONG_BREAK,
            "cycle count {} out of range",
            cycle_count
        );

        let (to, cycle_effect, hold) = match current {
            Mode::Work => (Mode::ShortBreak, CycleEffect::Increment, false),
            Mode::ShortBreak if cycle_count == CYCLES_PER_LONG_BREAK => {
                (Mode::LongBreak, CycleEffect::None, false)
            }
            Mode::ShortBreak => (Mode::Work, CycleEffect::None, false),
            Mode::LongBreak if cycle_count == CYCLES_PER_LONG_BREAK => {
                (Mode::Work, CycleEffect::None, true)
            }
            Mode::LongBreak => (Mode::Work, CycleEffect::Reset, false),
        };

        Transition {
            from: current,
            to,
            cycle_effect,
            hold,
        }
    }

    /// Plans and applies the transition out of the clock's current mode.
    ///
    /// The new countdown is taken from `durations` at this moment.
    pub fn advance(clock: &mut TimerClock, durations: &Durations) -> Transition {
        let transition = Self::plan(clock.mode(), clock.cycle_count());

        match transition.cycle_effect {
            CycleEffect::Increment => clock.cycles_mut().increment(),
            CycleEffect::Reset => clock.cycles_mut().reset(),
            CycleEffect::None => {}
        }

        clock.enter(transition.to, durations.seconds(transition.to));
        if transition.hold {
            clock.hold();
        }

        transition
    }
}
