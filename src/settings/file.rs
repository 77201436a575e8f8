//! JSON settings file for the session store.
//!
//! Only preferences are stored here. Timer state is never written.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::{Result, SettingsError};
use super::SessionStore;

/// Directory under the home directory holding the settings file.
const SETTINGS_DIR_NAME: &str = ".focus-timer";

/// File name of the settings file.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Returns `~/.focus-timer/settings.json`.
///
/// # Errors
///
/// Returns `SettingsError::HomeDirectoryNotFound` if the home directory
/// cannot be determined.
pub fn default_settings_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(SettingsError::HomeDirectoryNotFound)?;
    Ok(home.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
}

/// Loads the store from `path`.
///
/// A missing file yields the default store. Missing fields take their
/// defaults. The loaded store is validated.
pub fn load_settings(path: &Path) -> Result<SessionStore> {
    if !path.exists() {
        debug!("No settings file at {}, using defaults", path.display());
        return Ok(SessionStore::default());
    }

    let contents = fs::read_to_string(path).map_err(SettingsError::Read)?;
    let store: SessionStore = serde_json::from_str(&contents).map_err(SettingsError::Parse)?;
    store.validate()?;

    info!("Loaded settings from {}", path.display());
    Ok(store)
}

/// Writes the store to `path`, creating parent directories as needed.
pub fn save_settings(path: &Path, store: &SessionStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(SettingsError::Write)?;
    }

    let json = serde_json::to_string_pretty(store).map_err(SettingsError::Parse)?;
    fs::write(path, json).map_err(SettingsError::Write)?;

    debug!("Saved settings to {}", path.display());
    Ok(())
}
