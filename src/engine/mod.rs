//! Timer state machine.
//!
//! This module contains the pure, synchronous core:
//! - `clock`: countdown with pause/restart
//! - `cycle`: short-break counter
//! - `scheduler`: transition table between modes

pub mod clock;
pub mod cycle;
pub mod scheduler;

pub use clock::TimerClock;
pub use cycle::CycleCounter;
pub use scheduler::{CycleEffect, ModeScheduler, Transition};
