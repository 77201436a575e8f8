//! Error types for the session store.

use std::io;
use thiserror::Error;

use crate::types::{Mode, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};

/// Session store error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Configured duration is outside the accepted range.
    #[error(
        "{mode} duration must be between {} and {} minutes (got {minutes})",
        MIN_DURATION_MINUTES,
        MAX_DURATION_MINUTES
    )]
    DurationOutOfRange {
        /// Mode whose duration was rejected
        mode: Mode,
        /// Rejected value
        minutes: u32,
    },

    /// Unknown alert sound identifier.
    #[error("Unknown alert sound: {0}")]
    UnknownSound(String),

    /// Home directory not found.
    #[error("Failed to get home directory")]
    HomeDirectoryNotFound,

    /// Failed to read the settings file.
    #[error("Failed to read settings file: {0}")]
    Read(#[source] io::Error),

    /// Failed to write the settings file.
    #[error("Failed to write settings file: {0}")]
    Write(#[source] io::Error),

    /// Settings file is not valid JSON for the store.
    #[error("Failed to parse settings file: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
