//! Core data types for the pomodoro engine.
//!
//! This module defines the data structures used for:
//! - Interval modes and their durations
//! - Presentation preferences (font, accent color)
//! - The read-only snapshot handed to presentation layers
//! - Daemon runtime configuration
//! - IPC request/response serialization

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::settings::{CommitOutcome, PendingEdit};

/// Smallest duration (in minutes) any interval may have.
pub const MIN_MINUTES: u32 = 1;

/// Largest duration (in minutes) any interval may have.
pub const MAX_MINUTES: u32 = 99;

/// Number of short breaks that lead into a long break.
pub const CYCLES_PER_LONG_BREAK: u32 = 4;

// ============================================================================
// Mode
// ============================================================================

/// Which of the three interval types is currently counting down.
///
/// A `Mode` also names the matching field of [`Durations`], which is how the
/// settings layer addresses a single duration (`pomodoro`, `shortBreak`,
/// `longBreak`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Focused work interval
    #[default]
    #[serde(rename = "pomodoro")]
    #[value(name = "pomodoro")]
    Work,
    /// Short break between work intervals
    #[value(name = "short-break", alias = "shortBreak")]
    ShortBreak,
    /// Long break after a full set of cycles
    #[value(name = "long-break", alias = "longBreak")]
    LongBreak,
}

impl Mode {
    /// All modes in display order.
    pub const ALL: [Mode; 3] = [Mode::Work, Mode::ShortBreak, Mode::LongBreak];

    /// Returns the persisted/wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "pomodoro",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }

    /// Returns the human-readable tab label.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Work => "pomodoro",
            Mode::ShortBreak => "short break",
            Mode::LongBreak => "long break",
        }
    }

    /// Returns true for either kind of break.
    pub fn is_break(&self) -> bool {
        matches!(self, Mode::ShortBreak | Mode::LongBreak)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Durations
// ============================================================================

/// Interval lengths in minutes, each kept within `[MIN_MINUTES, MAX_MINUTES]`.
///
/// Serializes to the persisted `time` object:
/// `{"pomodoro": 25, "shortBreak": 5, "longBreak": 15}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Durations {
    /// Work duration in minutes
    pub pomodoro: u32,
    /// Short break duration in minutes
    pub short_break: u32,
    /// Long break duration in minutes
    pub long_break: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            pomodoro: 25,
            short_break: 5,
            long_break: 15,
        }
    }
}

impl Durations {
    /// Returns the duration in minutes for the given mode.
    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.pomodoro,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }

    /// Returns the duration in seconds for the given mode.
    pub fn seconds(&self, mode: Mode) -> u32 {
        self.minutes(mode) * 60
    }

    /// Mutable access to one field.
    pub(crate) fn minutes_mut(&mut self, mode: Mode) -> &mut u32 {
        match mode {
            Mode::Work => &mut self.pomodoro,
            Mode::ShortBreak => &mut self.short_break,
            Mode::LongBreak => &mut self.long_break,
        }
    }

    /// Returns a copy with every field clamped into range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            pomodoro: clamp_minutes(i64::from(self.pomodoro)),
            short_break: clamp_minutes(i64::from(self.short_break)),
            long_break: clamp_minutes(i64::from(self.long_break)),
        }
    }
}

/// Clamps a raw minute count into `[MIN_MINUTES, MAX_MINUTES]`.
pub fn clamp_minutes(raw: i64) -> u32 {
    raw.clamp(i64::from(MIN_MINUTES), i64::from(MAX_MINUTES)) as u32
}

// ============================================================================
// Preferences
// ============================================================================

/// Typeface used by the presentation layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl Font {
    pub fn as_str(&self) -> &'static str {
        match self {
            Font::Sans => "sans",
            Font::Serif => "serif",
            Font::Mono => "mono",
        }
    }

    /// Parses a persisted font name. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sans" => Some(Font::Sans),
            "serif" => Some(Font::Serif),
            "mono" => Some(Font::Mono),
            _ => None,
        }
    }

    /// Returns the font family the presentation layer should apply.
    pub fn family(&self) -> &'static str {
        match self {
            Font::Sans => "Kumbh Sans",
            Font::Serif => "Roboto Slab",
            Font::Mono => "Space Mono",
        }
    }
}

/// Accent color used for the active tab and the progress ring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Salmon,
    Turquoise,
    Lavender,
}

impl AccentColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccentColor::Salmon => "salmon",
            AccentColor::Turquoise => "turquoise",
            AccentColor::Lavender => "lavender",
        }
    }

    /// Parses a persisted color name. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "salmon" => Some(AccentColor::Salmon),
            "turquoise" => Some(AccentColor::Turquoise),
            "lavender" => Some(AccentColor::Lavender),
            _ => None,
        }
    }

    /// Returns the color as an `#RRGGBB` string.
    pub fn hex(&self) -> &'static str {
        match self {
            AccentColor::Salmon => "#F87070",
            AccentColor::Turquoise => "#70F3F8",
            AccentColor::Lavender => "#D881F8",
        }
    }

    /// Returns the color as an `(r, g, b)` triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            AccentColor::Salmon => (0xF8, 0x70, 0x70),
            AccentColor::Turquoise => (0x70, 0xF3, 0xF8),
            AccentColor::Lavender => (0xD8, 0x81, 0xF8),
        }
    }
}

/// Presentation-only preferences. They never affect scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub font: Font,
    #[serde(rename = "color")]
    pub accent_color: AccentColor,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Label of the single start/pause button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLabel {
    Start,
    Pause,
    Restart,
}

impl ActionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionLabel::Start => "start",
            ActionLabel::Pause => "pause",
            ActionLabel::Restart => "restart",
        }
    }
}

/// Read-only view of the engine, recomputed after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Active mode
    pub mode: Mode,
    /// Remaining whole minutes, two digits
    pub minutes: String,
    /// Remaining seconds within the minute, two digits
    pub seconds: String,
    /// Remaining share of the interval, 0..=100
    pub percentage: f64,
    /// Start/pause button label
    pub action_label: ActionLabel,
    /// Active accent color
    pub accent_color: AccentColor,
    /// Active font
    pub font: Font,
    /// Raw remaining seconds
    pub seconds_left: u32,
    /// Whether the countdown is paused
    pub is_paused: bool,
    /// Short breaks entered since the last restart
    pub cycle_count: u32,
}

/// Formats a value as at least two digits, zero-padded.
pub fn two_digits(value: u32) -> String {
    format!("{:02}", value)
}

// ============================================================================
// DaemonConfig
// ============================================================================

/// Socket file name under the per-user runtime directory.
const SOCKET_FILE: &str = ".pomocycle/pomocycle.sock";

/// Settings file name under the per-user config directory.
const SETTINGS_FILE: &str = "pomocycle/settings.json";

/// File-system locations used by the daemon and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Unix socket the daemon listens on
    pub socket_path: PathBuf,
    /// JSON file backing the settings store
    pub settings_path: PathBuf,
}

impl DaemonConfig {
    /// Resolves the default paths, applying any overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and a path
    /// was not overridden.
    pub fn resolve(
        socket_override: Option<PathBuf>,
        settings_override: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let socket_path = match socket_override {
            Some(path) => path,
            None => default_socket_path()?,
        };
        let settings_path = match settings_override {
            Some(path) => path,
            None => default_settings_path()?,
        };
        Ok(Self {
            socket_path,
            settings_path,
        })
    }
}

/// Returns `~/.pomocycle/pomocycle.sock`.
pub fn default_socket_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(SOCKET_FILE))
}

/// Returns `<config_dir>/pomocycle/settings.json`, falling back to the home
/// directory on platforms without a config directory.
pub fn default_settings_path() -> anyhow::Result<PathBuf> {
    if let Some(config) = dirs::config_dir() {
        return Ok(config.join(SETTINGS_FILE));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".pomocycle").join("settings.json"))
}

// ============================================================================
// IPC Types
// ============================================================================

/// Direction of a single-step duration edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationDelta {
    Increment,
    Decrement,
}

/// IPC request from client to daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum IpcRequest {
    /// Start, pause, or restart the countdown
    Toggle,
    /// Query the current snapshot
    Status,
    /// Begin a fresh settings draft
    OpenSettings,
    /// Leave the settings dialog, discarding the draft
    CloseSettings,
    /// Step one duration of the draft
    EditDuration { field: Mode, delta: DurationDelta },
    /// Choose the draft font
    EditFont { font: Font },
    /// Choose the draft accent color
    EditColor { color: AccentColor },
    /// Commit the draft
    CommitSettings,
    /// Discard the draft
    CancelSettings,
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    /// Snapshot after the request was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<TimerSnapshot>,
    /// Live durations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durations: Option<Durations>,
    /// Open settings draft, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingEdit>,
    /// Result of a commit request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitOutcome>,
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Returns true if the daemon reported success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Mode Tests
    // ------------------------------------------------------------------------

    mod mode_tests {
        use super::*;

        #[test]
        fn test_default_is_work() {
            assert_eq!(Mode::default(), Mode::Work);
        }

        #[test]
        fn test_wire_names() {
            assert_eq!(serde_json::to_string(&Mode::Work).unwrap(), "\"pomodoro\"");
            assert_eq!(
                serde_json::to_string(&Mode::ShortBreak).unwrap(),
                "\"shortBreak\""
            );
            assert_eq!(
                serde_json::to_string(&Mode::LongBreak).unwrap(),
                "\"longBreak\""
            );
            for mode in Mode::ALL {
                assert_eq!(serde_json::to_string(&mode).unwrap(), format!("\"{mode}\""));
            }
        }

        #[test]
        fn test_is_break() {
            assert!(!Mode::Work.is_break());
            assert!(Mode::ShortBreak.is_break());
            assert!(Mode::LongBreak.is_break());
        }
    }

    // ------------------------------------------------------------------------
    // Durations Tests
    // ------------------------------------------------------------------------

    mod durations_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let durations = Durations::default();
            assert_eq!(durations.pomodoro, 25);
            assert_eq!(durations.short_break, 5);
            assert_eq!(durations.long_break, 15);
        }

        #[test]
        fn test_seconds_per_mode() {
            let durations = Durations::default();
            assert_eq!(durations.seconds(Mode::Work), 1500);
            assert_eq!(durations.seconds(Mode::ShortBreak), 300);
            assert_eq!(durations.seconds(Mode::LongBreak), 900);
        }

        #[test]
        fn test_persisted_shape() {
            let json = serde_json::to_string(&Durations::default()).unwrap();
            assert_eq!(json, r#"{"pomodoro":25,"shortBreak":5,"longBreak":15}"#);
        }

        #[test]
        fn test_clamped() {
            let durations = Durations {
                pomodoro: 0,
                short_break: 150,
                long_break: 42,
            }
            .clamped();
            assert_eq!(durations.pomodoro, 1);
            assert_eq!(durations.short_break, 99);
            assert_eq!(durations.long_break, 42);
        }

        #[test]
        fn test_clamp_minutes_negative() {
            assert_eq!(clamp_minutes(-7), MIN_MINUTES);
            assert_eq!(clamp_minutes(1_000), MAX_MINUTES);
        }
    }

    // ------------------------------------------------------------------------
    // Preferences Tests
    // ------------------------------------------------------------------------

    mod preferences_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let prefs = Preferences::default();
            assert_eq!(prefs.font, Font::Sans);
            assert_eq!(prefs.accent_color, AccentColor::Salmon);
        }

        #[test]
        fn test_parse_known_and_unknown() {
            assert_eq!(Font::parse("mono"), Some(Font::Mono));
            assert_eq!(Font::parse("comic"), None);
            assert_eq!(AccentColor::parse("lavender"), Some(AccentColor::Lavender));
            assert_eq!(AccentColor::parse("Salmon"), None);
        }

        #[test]
        fn test_hex_matches_rgb() {
            for color in [
                AccentColor::Salmon,
                AccentColor::Turquoise,
                AccentColor::Lavender,
            ] {
                let (r, g, b) = color.rgb();
                assert_eq!(color.hex(), format!("#{:02X}{:02X}{:02X}", r, g, b));
            }
        }
    }

    // ------------------------------------------------------------------------
    // IPC Type Tests
    // ------------------------------------------------------------------------

    mod ipc_tests {
        use super::*;

        #[test]
        fn test_request_tagging() {
            let json = serde_json::to_string(&IpcRequest::Toggle).unwrap();
            assert_eq!(json, r#"{"command":"toggle"}"#);

            let json = serde_json::to_string(&IpcRequest::EditDuration {
                field: Mode::ShortBreak,
                delta: DurationDelta::Increment,
            })
            .unwrap();
            assert_eq!(
                json,
                r#"{"command":"edit_duration","field":"shortBreak","delta":"increment"}"#
            );
        }

        #[test]
        fn test_request_parse_color() {
            let request: IpcRequest =
                serde_json::from_str(r#"{"command":"edit_color","color":"turquoise"}"#).unwrap();
            assert_eq!(
                request,
                IpcRequest::EditColor {
                    color: AccentColor::Turquoise
                }
            );
        }

        #[test]
        fn test_response_success_and_error() {
            let ok = IpcResponse::success("done", None);
            assert!(ok.is_success());
            let json = serde_json::to_string(&ok).unwrap();
            assert!(!json.contains("data"));

            let err = IpcResponse::error("boom");
            assert!(!err.is_success());
            assert_eq!(err.message, "boom");
        }

        #[test]
        fn test_two_digits() {
            assert_eq!(two_digits(0), "00");
            assert_eq!(two_digits(7), "07");
            assert_eq!(two_digits(99), "99");
        }
    }

    // ------------------------------------------------------------------------
    // DaemonConfig Tests
    // ------------------------------------------------------------------------

    mod daemon_config_tests {
        use super::*;

        #[test]
        fn test_overrides_win() {
            let config = DaemonConfig::resolve(
                Some(PathBuf::from("/tmp/a.sock")),
                Some(PathBuf::from("/tmp/s.json")),
            )
            .unwrap();
            assert_eq!(config.socket_path, PathBuf::from("/tmp/a.sock"));
            assert_eq!(config.settings_path, PathBuf::from("/tmp/s.json"));
        }
    }
}
