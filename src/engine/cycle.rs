//! Cycle counter: short breaks entered since the last restart.

use serde::{Deserialize, Serialize};

use crate::types::CYCLES_PER_LONG_BREAK;

/// Counts short breaks entered, from 0 up to [`CYCLES_PER_LONG_BREAK`].
///
/// Mutated only by the mode scheduler (on short-break entry) and by the
/// restart path of the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCounter {
    count: u32,
}

impl CycleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current count.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Adds one, saturating at [`CYCLES_PER_LONG_BREAK`].
    pub fn increment(&mut self) {
        debug_assert!(
            self.count < CYCLES_PER_LONG_BREAK,
            "cycle counter incremented past {}",
            CYCLES_PER_LONG_BREAK
        );
        self.count = (self.count + 1).min(CYCLES_PER_LONG_BREAK);
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Returns true once a full set of short breaks has been entered.
    pub fn is_complete(&self) -> bool {
        self.count == CYCLES_PER_LONG_BREAK
    }
}
