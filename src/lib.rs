//! Pomocycle Library
//!
//! This library provides the core functionality for the pomocycle timer.
//! It includes:
//! - Countdown clock, mode scheduling and cycle counting (`engine`)
//! - Persisted settings with a draft/commit path (`settings`)
//! - Timer daemon with a Unix socket IPC server (`daemon`)
//! - CLI command parsing, IPC client and display utilities (`cli`)
//! - Shared type definitions (`types`)

pub mod cli;
pub mod daemon;
pub mod engine;
pub mod settings;
pub mod types;

// Re-export commonly used types for convenience
pub use daemon::{TimerEngine, TimerEvent};
pub use engine::{CycleCounter, ModeScheduler, TimerClock};
pub use settings::{
    CommitOutcome, FileStore, KeyValueStore, MemoryStore, PendingEdit, SettingsApplier,
    SettingsError, SettingsStore,
};
pub use types::{
    AccentColor, ActionLabel, DaemonConfig, Durations, Font, IpcRequest, IpcResponse, Mode,
    Preferences, ResponseData, TimerSnapshot,
};
