//! Command definitions for the pomocycle CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::{AccentColor, DurationDelta, Font, IpcRequest, Mode};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomocycle - a pomodoro timer daemon and its command-line remote
#[derive(Parser, Debug)]
#[command(
    name = "pomocycle",
    version,
    about = "Pomodoro timer with work, short break and long break cycles",
    long_about = "A pomodoro timer that runs as a background daemon.\n\
                  Four work intervals separated by short breaks are followed by a long break,\n\
                  after which the timer holds until restarted.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Daemon socket path [default: ~/.pomocycle/pomocycle.sock]
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    /// Settings file path used by the daemon
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the timer daemon in the foreground
    Daemon,

    /// Start, pause, resume, or restart after a full cycle
    Toggle,

    /// Show the current timer state
    Status,

    /// Redraw the timer state every second until interrupted
    Watch,

    /// Inspect or edit settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings draft operations.
///
/// Edits accumulate in a draft held by the daemon and take effect only on
/// `commit`.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    /// Show the live settings and any open draft
    Show,

    /// Open a draft from the live settings
    Open,

    /// Add one minute to a duration in the draft
    Inc {
        #[arg(value_enum)]
        field: Mode,
    },

    /// Remove one minute from a duration in the draft
    Dec {
        #[arg(value_enum)]
        field: Mode,
    },

    /// Choose the font in the draft
    Font {
        #[arg(value_enum)]
        font: Font,
    },

    /// Choose the accent color in the draft
    Color {
        #[arg(value_enum)]
        color: AccentColor,
    },

    /// Apply the draft
    Commit,

    /// Discard the draft
    Cancel,
}

impl SettingsCommand {
    /// Maps the subcommand to the daemon request it sends.
    pub fn to_request(&self) -> IpcRequest {
        match self {
            Self::Show => IpcRequest::Status,
            Self::Open => IpcRequest::OpenSettings,
            Self::Inc { field } => IpcRequest::EditDuration {
                field: *field,
                delta: DurationDelta::Increment,
            },
            Self::Dec { field } => IpcRequest::EditDuration {
                field: *field,
                delta: DurationDelta::Decrement,
            },
            Self::Font { font } => IpcRequest::EditFont { font: *font },
            Self::Color { color } => IpcRequest::EditColor { color: *color },
            Self::Commit => IpcRequest::CommitSettings,
            Self::Cancel => IpcRequest::CancelSettings,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
