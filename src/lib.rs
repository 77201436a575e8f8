//! Focus Timer Library
//!
//! This library provides the core functionality for the focus timer.
//! It includes:
//! - Countdown engine with per-mode ledgers, laps and alarms
//! - Tick drivers with cancellation guards
//! - Alert-sound player and ambient-sound mixer over a pluggable audio backend
//! - Session store for durations and the selected alert sound
//! - Notifications for presentation
//! - CLI command parsing, display utilities and the interactive session

pub mod cli;
pub mod engine;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod task;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{format_time, Mode, SessionSnapshot, TimerStatus};

pub use engine::{
    AlarmState, CountdownEngine, IntervalTickScheduler, LapOutcome, ManualTickScheduler, Tick,
    TickScheduler,
};

pub use notification::{Notification, Notifier};

pub use settings::{AlertSound, ModeDurations, SessionStore, SettingsError, SettingsHandle};

pub use sound::{
    AlertPlayer, AmbientMixer, AmbientTrack, AudioBackend, AudioContext, AudioOutput,
    MockAudioBackend, SoundError, SoundLibrary,
};

pub use task::TaskGuard;
