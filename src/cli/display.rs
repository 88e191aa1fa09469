//! Display utilities for the pomocycle CLI.
//!
//! This module provides formatted output for:
//! - The timer snapshot (mode tabs, clock, progress, action)
//! - The settings draft and commit results
//! - Error messages
//!
//! Every `render_*` function returns the text so it can be tested; the
//! `show_*` wrappers print it.

use std::fmt::Write as _;

use crate::settings::{CommitOutcome, PendingEdit};
use crate::types::{IpcResponse, Mode, TimerSnapshot};

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 30;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders the mode tabs, with the active one bracketed.
    pub fn render_tabs(active: Mode) -> String {
        Mode::ALL
            .iter()
            .map(|mode| {
                if *mode == active {
                    format!("[{}]", mode.label())
                } else {
                    format!(" {} ", mode.label())
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// Renders a remaining-share bar for `percentage` in 0..=100.
    pub fn render_bar(percentage: f64) -> String {
        let ratio = (percentage / 100.0).clamp(0.0, 1.0);
        let filled = (ratio * BAR_WIDTH as f64).round() as usize;
        format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }

    /// Renders a full snapshot.
    pub fn render_snapshot(snapshot: &TimerSnapshot) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", Self::render_tabs(snapshot.mode));
        let _ = writeln!(out);
        let _ = writeln!(out, "    {}:{}", snapshot.minutes, snapshot.seconds);
        let _ = writeln!(
            out,
            "    {} {:>5.1}%",
            Self::render_bar(snapshot.percentage),
            snapshot.percentage
        );
        let _ = writeln!(out, "    {}", snapshot.action_label.as_str().to_uppercase());
        let _ = writeln!(out);
        let _ = write!(
            out,
            "cycle {}/4 | color {} ({}) | font {} ({})",
            snapshot.cycle_count,
            snapshot.accent_color.as_str(),
            snapshot.accent_color.hex(),
            snapshot.font.as_str(),
            snapshot.font.family()
        );
        out
    }

    /// Renders an open settings draft.
    pub fn render_pending(pending: &PendingEdit) -> String {
        let mut out = String::from("Settings draft (uncommitted)\n");
        for mode in Mode::ALL {
            let _ = writeln!(
                out,
                "  {:<12} {:>2} min",
                mode.label(),
                pending.durations.minutes(mode)
            );
        }
        let _ = writeln!(out, "  {:<12} {}", "font", pending.preferences.font.as_str());
        let _ = write!(
            out,
            "  {:<12} {}",
            "color",
            pending.preferences.accent_color.as_str()
        );
        out
    }

    /// Renders the result of a commit.
    pub fn render_commit(outcome: &CommitOutcome) -> String {
        let mut lines = Vec::new();
        if outcome.durations_changed {
            lines.push("Durations changed: timer reset to a paused work interval");
        }
        if outcome.preferences_changed {
            lines.push("Appearance updated");
        }
        if !outcome.durations_changed && !outcome.preferences_changed {
            lines.push("Nothing changed");
        }
        if !outcome.persisted {
            lines.push("Warning: settings could not be saved and will be lost on restart");
        }
        lines.join("\n")
    }

    /// Renders everything a response carries.
    pub fn render_response(response: &IpcResponse) -> String {
        let mut sections = Vec::new();
        if !response.message.is_empty() {
            sections.push(format!("* {}", response.message));
        }
        if let Some(data) = &response.data {
            if let Some(commit) = &data.commit {
                sections.push(Self::render_commit(commit));
            }
            if let Some(snapshot) = &data.snapshot {
                sections.push(Self::render_snapshot(snapshot));
            }
            if let Some(pending) = &data.pending {
                sections.push(Self::render_pending(pending));
            }
        }
        sections.join("\n\n")
    }

    /// Shows a daemon response.
    pub fn show_response(response: &IpcResponse) {
        println!("{}", Self::render_response(response));
    }

    /// Clears the terminal and shows a snapshot (used by `watch`).
    pub fn show_watch_frame(snapshot: &TimerSnapshot) {
        print!("\x1B[2J\x1B[H");
        println!("{}", Self::render_snapshot(snapshot));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
