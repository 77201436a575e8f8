//! Display utilities for the focus timer.
//!
//! This module provides formatted output for:
//! - Notification toasts
//! - Status and lap listings
//! - The sound catalog
//! - Error messages
//!
//! `format_*` functions build the text; `show_*` functions print it.

use crate::notification::Notification;
use crate::sound::SoundLibrary;
use crate::types::{SessionSnapshot, TimerStatus};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Formats a notification as a one-line toast.
    pub fn format_notification(notification: &Notification) -> String {
        format!(
            "[{}] {}",
            notification.title(),
            notification.description()
        )
    }

    /// Shows a notification toast.
    pub fn show_notification(notification: &Notification) {
        println!("{}", Self::format_notification(notification));
    }

    /// Formats the timer status block.
    pub fn format_status(snapshot: &SessionSnapshot) -> String {
        let mut out = String::new();
        out.push_str("Focus Timer Status\n");
        out.push_str("─────────────────────────────\n");
        out.push_str(&format!("Mode:      {}\n", snapshot.mode.label()));
        out.push_str(&format!("State:     {}", snapshot.status.as_str()));
        if snapshot.status == TimerStatus::Alarming {
            out.push_str(" (type `ack` to stop)");
        }
        out.push('\n');
        out.push_str(&format!("Remaining: {}\n", snapshot.remaining));
        out.push_str(&format!("Laps:      {}", snapshot.laps.len()));
        out
    }

    /// Shows the timer status block.
    pub fn show_status(snapshot: &SessionSnapshot) {
        println!("{}", Self::format_status(snapshot));
    }

    /// Formats recorded laps, one numbered line each.
    pub fn format_laps(laps: &[String]) -> String {
        if laps.is_empty() {
            return "No laps recorded".to_string();
        }
        laps.iter()
            .enumerate()
            .map(|(i, lap)| format!("#{:<3} {}", i + 1, lap))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Shows recorded laps.
    pub fn show_laps(laps: &[String]) {
        println!("{}", Self::format_laps(laps));
    }

    /// Formats the sound catalog with resolved paths.
    pub fn format_sounds(library: &SoundLibrary) -> String {
        library
            .catalog()
            .iter()
            .map(|resource| {
                let marker = if resource.exists() { "" } else { " (missing)" };
                format!(
                    "{:<8} {}{}",
                    resource.name(),
                    resource.path().display(),
                    marker
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Shows the sound catalog.
    pub fn show_sounds(library: &SoundLibrary) {
        println!("{}", Self::format_sounds(library));
    }

    /// Shows the remaining time on its own line.
    pub fn show_remaining(snapshot: &SessionSnapshot) {
        println!("{} {}", snapshot.mode.label(), snapshot.remaining);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
