//! Core data types for the focus timer.
//!
//! This module defines the data structures used for:
//! - Timer modes and their per-mode remaining-time ledger
//! - Derived timer status
//! - Time formatting
//! - Serializable session snapshots for presentation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Seconds per configured minute when seeding the ledger.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Smallest configurable duration in minutes.
pub const MIN_DURATION_MINUTES: u32 = 1;

/// Largest configurable duration in minutes.
pub const MAX_DURATION_MINUTES: u32 = 180;

/// Remaining seconds at which the "almost done" notification fires.
pub const ALMOST_DONE_SECONDS: u32 = 10;

// ============================================================================
// Mode
// ============================================================================

/// One of the three fixed countdown contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Focused work
    Work,
    /// Short rest between work blocks
    ShortRest,
    /// Long rest
    LongRest,
}

impl Mode {
    /// All modes in display order.
    pub const ALL: [Mode; 3] = [Mode::Work, Mode::ShortRest, Mode::LongRest];

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Work => "Work",
            Mode::ShortRest => "Short Rest",
            Mode::LongRest => "Long Rest",
        }
    }

    const fn index(self) -> usize {
        match self {
            Mode::Work => 0,
            Mode::ShortRest => 1,
            Mode::LongRest => 2,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Work
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "work" | "pomodoro" => Ok(Mode::Work),
            "short" | "short_rest" | "short_break" => Ok(Mode::ShortRest),
            "long" | "long_rest" | "long_break" => Ok(Mode::LongRest),
            other => Err(format!(
                "unknown mode '{}' (expected work, short or long)",
                other
            )),
        }
    }
}

// ============================================================================
// TimerStatus
// ============================================================================

/// Observable state of the countdown engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// Not counting down
    Stopped,
    /// Counting down once per second
    Running,
    /// Countdown reached zero and the alarm is sounding
    Alarming,
}

impl TimerStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Stopped => "stopped",
            TimerStatus::Running => "running",
            TimerStatus::Alarming => "alarming",
        }
    }
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Stopped
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// Remaining seconds for every mode.
///
/// Backed by a fixed array so every mode always has an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ledger {
    seconds: [u32; 3],
}

impl Ledger {
    /// Builds a ledger from a per-mode seeding function.
    pub fn from_fn(mut f: impl FnMut(Mode) -> u32) -> Self {
        let mut seconds = [0; 3];
        for mode in Mode::ALL {
            seconds[mode.index()] = f(mode);
        }
        Self { seconds }
    }

    /// Returns the remaining seconds recorded for a mode.
    pub fn get(&self, mode: Mode) -> u32 {
        self.seconds[mode.index()]
    }

    /// Records the remaining seconds for a mode.
    pub fn set(&mut self, mode: Mode, seconds: u32) {
        self.seconds[mode.index()] = seconds;
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Formats seconds as `MM:SS`.
///
/// Minutes are padded to two digits and are not capped at 59.
pub fn format_time(total_seconds: u32) -> String {
    format!(
        "{:02}:{:02}",
        total_seconds / SECONDS_PER_MINUTE,
        total_seconds % SECONDS_PER_MINUTE
    )
}

// ============================================================================
// SessionSnapshot
// ============================================================================

/// Read-only view of the timer session for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Selected mode
    pub mode: Mode,
    /// Current status
    pub status: TimerStatus,
    /// Remaining seconds of the selected mode
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Remaining time formatted as `MM:SS`
    pub remaining: String,
    /// Whether the countdown is running
    #[serde(rename = "isRunning")]
    pub is_running: bool,
    /// Whether the alarm is sounding
    #[serde(rename = "alarmActive")]
    pub alarm_active: bool,
    /// Recorded laps in insertion order
    pub laps: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
