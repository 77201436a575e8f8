//! Sound system error types.
//!
//! Playback errors never abort a timer transition. Callers log them and
//! carry on, so every variant has a user-facing suggestion.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("Audio device is not available: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the resolved path.
    #[error("Sound file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("Failed to decode sound file: {0}")]
    DecodeError(String),

    /// The output stream refused a new sink.
    #[error("Sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_))
    }

    /// Returns true if this error is related to the audio file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "Connect an audio output device",
            Self::FileNotFound(_) => "Check the --assets directory",
            Self::DecodeError(_) => "The sound file may be corrupted",
            Self::PlaybackError(_) => "Check the system audio settings",
        }
    }
}
