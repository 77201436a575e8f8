//! Sound resource resolution.
//!
//! Sound identifiers map to files under an asset root by naming convention:
//!
//! ```text
//! <root>/sounds/<alert id>.mp3     alert sounds (alarm and preview)
//! <root>/audio/<track>.mp3         ambient tracks
//! ```
//!
//! The core never reads the bytes itself. It only hands resolved resources to
//! an audio output.

use std::path::{Path, PathBuf};

use super::ambient::AmbientTrack;
use crate::settings::AlertSound;

/// Default asset root, relative to the working directory.
pub const DEFAULT_ASSET_ROOT: &str = "assets";

const ALERT_DIR: &str = "sounds";
const AMBIENT_DIR: &str = "audio";
const SOUND_EXTENSION: &str = "mp3";

/// A playable sound resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundResource {
    name: String,
    path: PathBuf,
}

impl SoundResource {
    /// Creates a resource from a name and path.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Returns the sound identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Resolves sound identifiers to resources under an asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundLibrary {
    root: PathBuf,
}

impl Default for SoundLibrary {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_ROOT)
    }
}

impl SoundLibrary {
    /// Creates a library rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the asset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves an alert sound.
    #[must_use]
    pub fn alert(&self, sound: AlertSound) -> SoundResource {
        self.resolve(ALERT_DIR, sound.id())
    }

    /// Resolves an ambient track.
    #[must_use]
    pub fn ambient(&self, track: AmbientTrack) -> SoundResource {
        self.resolve(AMBIENT_DIR, track.as_str())
    }

    /// Lists every alert sound and ambient track this library knows.
    #[must_use]
    pub fn catalog(&self) -> Vec<SoundResource> {
        AlertSound::ALL
            .into_iter()
            .map(|sound| self.alert(sound))
            .chain(AmbientTrack::ALL.into_iter().map(|track| self.ambient(track)))
            .collect()
    }

    fn resolve(&self, dir: &str, name: &str) -> SoundResource {
        let path = self
            .root
            .join(dir)
            .join(name)
            .with_extension(SOUND_EXTENSION);
        SoundResource::new(name, path)
    }
}
