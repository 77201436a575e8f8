//! Session store: durable user preferences for the focus timer.
//!
//! The store holds the per-mode target durations and the selected alert
//! sound. It has no temporal logic of its own. Presentation writes to it,
//! the countdown engine and the alert player read from it on every
//! operation through a shared [`SettingsHandle`], so edits apply on the next
//! transition without rebuilding anything.

mod error;
mod file;

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Mode, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES, SECONDS_PER_MINUTE};

pub use error::{Result, SettingsError};
pub use file::{default_settings_path, load_settings, save_settings, SETTINGS_FILE_NAME};

// ============================================================================
// AlertSound
// ============================================================================

/// Alert sounds available for the alarm and previews.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AlertSound {
    /// Bell
    #[default]
    Bell,
    /// Chicken
    Chicken,
    /// Alert beep
    Alert,
    /// Chime
    Chime,
}

impl AlertSound {
    /// All alert sounds in display order.
    pub const ALL: [AlertSound; 4] = [
        AlertSound::Bell,
        AlertSound::Chicken,
        AlertSound::Alert,
        AlertSound::Chime,
    ];

    /// Returns the identifier used to resolve the sound resource.
    pub fn id(&self) -> &'static str {
        match self {
            AlertSound::Bell => "bell",
            AlertSound::Chicken => "chicken",
            AlertSound::Alert => "alert",
            AlertSound::Chime => "chime",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AlertSound::Bell => "Bell Sound",
            AlertSound::Chicken => "Chicken Sound",
            AlertSound::Alert => "Alert Sound",
            AlertSound::Chime => "Chime Sound",
        }
    }
}

impl fmt::Display for AlertSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AlertSound {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self> {
        AlertSound::ALL
            .into_iter()
            .find(|sound| sound.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| SettingsError::UnknownSound(s.to_string()))
    }
}

// ============================================================================
// ModeDurations
// ============================================================================

fn default_work_minutes() -> u32 {
    25
}

fn default_short_rest_minutes() -> u32 {
    5
}

fn default_long_rest_minutes() -> u32 {
    15
}

/// Configured duration of each mode, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDurations {
    /// Work duration in minutes (1-180)
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Short rest duration in minutes (1-180)
    #[serde(default = "default_short_rest_minutes")]
    pub short_rest_minutes: u32,
    /// Long rest duration in minutes (1-180)
    #[serde(default = "default_long_rest_minutes")]
    pub long_rest_minutes: u32,
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_rest_minutes: default_short_rest_minutes(),
            long_rest_minutes: default_long_rest_minutes(),
        }
    }
}

impl ModeDurations {
    /// Returns the configured minutes for a mode.
    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_minutes,
            Mode::ShortRest => self.short_rest_minutes,
            Mode::LongRest => self.long_rest_minutes,
        }
    }

    /// Returns the configured duration for a mode in seconds.
    pub fn seconds(&self, mode: Mode) -> u32 {
        self.minutes(mode) * SECONDS_PER_MINUTE
    }

    /// Sets the minutes for a mode after range validation.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::DurationOutOfRange` outside 1-180 minutes.
    pub fn set_minutes(&mut self, mode: Mode, minutes: u32) -> Result<()> {
        validate_minutes(mode, minutes)?;
        match mode {
            Mode::Work => self.work_minutes = minutes,
            Mode::ShortRest => self.short_rest_minutes = minutes,
            Mode::LongRest => self.long_rest_minutes = minutes,
        }
        Ok(())
    }

    /// Validates every configured duration.
    pub fn validate(&self) -> Result<()> {
        for mode in Mode::ALL {
            validate_minutes(mode, self.minutes(mode))?;
        }
        Ok(())
    }
}

fn validate_minutes(mode: Mode, minutes: u32) -> Result<()> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(SettingsError::DurationOutOfRange { mode, minutes });
    }
    Ok(())
}

// ============================================================================
// SessionStore
// ============================================================================

/// Durable user preferences consumed by the timer core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStore {
    /// Per-mode durations
    #[serde(default)]
    pub durations: ModeDurations,
    /// Selected alert sound
    #[serde(default)]
    pub alert_sound: AlertSound,
}

impl SessionStore {
    /// Creates a store with the given durations and alert sound.
    pub fn new(durations: ModeDurations, alert_sound: AlertSound) -> Self {
        Self {
            durations,
            alert_sound,
        }
    }

    /// Validates the store.
    pub fn validate(&self) -> Result<()> {
        self.durations.validate()
    }
}

// ============================================================================
// SettingsHandle
// ============================================================================

/// Shared reference to the session store.
///
/// Cloning the handle shares the same store.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<SessionStore>>,
}

impl SettingsHandle {
    /// Wraps a store in a shareable handle.
    pub fn new(store: SessionStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Returns the configured duration for a mode in seconds.
    pub fn duration_seconds(&self, mode: Mode) -> u32 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .durations
            .seconds(mode)
    }

    /// Returns the selected alert sound.
    pub fn alert_sound(&self) -> AlertSound {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .alert_sound
    }

    /// Sets the configured minutes for a mode.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::DurationOutOfRange` outside 1-180 minutes;
    /// the store is left unchanged.
    pub fn set_duration(&self, mode: Mode, minutes: u32) -> Result<()> {
        let mut store = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        store.durations.set_minutes(mode, minutes)?;
        debug!("{} duration set to {} minutes", mode, minutes);
        Ok(())
    }

    /// Selects the alert sound.
    pub fn set_alert_sound(&self, sound: AlertSound) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .alert_sound = sound;
        debug!("Alert sound set to {}", sound);
    }
}
