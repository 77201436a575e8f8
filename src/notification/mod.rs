//! User-facing notifications ("toasts").
//!
//! The countdown engine and the ambient mixer report what happened through a
//! [`Notifier`]. Each [`Notification`] carries a short title and description
//! for presentation. Delivery is best effort: a closed receiver never fails
//! the operation that produced the notification.

use tokio::sync::mpsc;
use tracing::debug;

use crate::sound::AmbientTrack;

// ============================================================================
// Notification
// ============================================================================

/// Notification emitted by the timer core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Ten seconds remain
    AlmostDone,
    /// Countdown reached zero and the alarm started
    Complete,
    /// A lap was recorded
    LapRecorded {
        /// Formatted lap time
        lap: String,
    },
    /// A lap with the same time already exists
    DuplicateLap {
        /// Formatted lap time
        lap: String,
    },
    /// Countdown started
    Started,
    /// Countdown paused
    Paused,
    /// Timer reset to configured durations
    Reset,
    /// Alarm acknowledged
    AlarmStopped,
    /// Ambient track started
    SoundPlaying {
        /// Track now playing
        track: AmbientTrack,
    },
    /// Ambient track stopped
    SoundStopped {
        /// Track that stopped
        track: AmbientTrack,
    },
}

impl Notification {
    /// Returns the stable kind identifier.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::AlmostDone => "almost-done",
            Notification::Complete => "complete",
            Notification::LapRecorded { .. } => "lap-recorded",
            Notification::DuplicateLap { .. } => "duplicate-lap",
            Notification::Started => "started",
            Notification::Paused => "paused",
            Notification::Reset => "reset",
            Notification::AlarmStopped => "alarm-stopped",
            Notification::SoundPlaying { .. } => "sound-playing",
            Notification::SoundStopped { .. } => "sound-stopped",
        }
    }

    /// Returns the notification title.
    pub fn title(&self) -> &'static str {
        match self {
            Notification::AlmostDone => "Almost Done!",
            Notification::Complete => "Timer Complete",
            Notification::LapRecorded { .. } => "Lap Recorded",
            Notification::DuplicateLap { .. } => "Duplicate Lap Ignored",
            Notification::Started => "Timer Started",
            Notification::Paused => "Timer Paused",
            Notification::Reset => "Timer Reset",
            Notification::AlarmStopped => "Alarm Stopped",
            Notification::SoundPlaying { .. } => "Sound playing",
            Notification::SoundStopped { .. } => "Sound stopped",
        }
    }

    /// Returns the notification description.
    pub fn description(&self) -> String {
        match self {
            Notification::AlmostDone => "Timer will complete in 10 seconds".to_string(),
            Notification::Complete => "Time to take a break!".to_string(),
            Notification::LapRecorded { lap } => format!("Lap time: {}", lap),
            Notification::DuplicateLap { lap } => format!("Lap {} already exists", lap),
            Notification::Started => "Stay focused!".to_string(),
            Notification::Paused => "Timer has been paused".to_string(),
            Notification::Reset => "Timer has been reset".to_string(),
            Notification::AlarmStopped => "Alarm has been acknowledged".to_string(),
            Notification::SoundPlaying { track } => format!("Now playing {} sound", track),
            Notification::SoundStopped { track } => format!("{} sound has been stopped", track),
        }
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Creates a notifier from an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    /// Creates a notifier together with its receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Delivers a notification.
    pub fn notify(&self, notification: Notification) {
        debug!("Notification: {}", notification.kind());
        if self.tx.send(notification).is_err() {
            debug!("Notification receiver closed, dropping notification");
        }
    }
}
