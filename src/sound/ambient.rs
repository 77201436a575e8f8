//! Ambient sound mixer.
//!
//! A fixed set of looping background tracks of which at most one plays at a
//! time. The mixer's exclusivity is independent of the alert player: an
//! ambient track keeps playing under an alarm.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::output::{AudioContext, AudioOutput, PlaybackMode};
use crate::notification::{Notification, Notifier};

// ============================================================================
// AmbientTrack
// ============================================================================

/// Looping background tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AmbientTrack {
    /// Ocean waves
    Waves,
    /// Forest ambience
    Forest,
    /// Rainfall
    Rain,
}

impl AmbientTrack {
    /// All tracks in display order.
    pub const ALL: [AmbientTrack; 3] = [
        AmbientTrack::Waves,
        AmbientTrack::Forest,
        AmbientTrack::Rain,
    ];

    /// Returns the identifier used to resolve the track resource.
    pub fn as_str(&self) -> &'static str {
        match self {
            AmbientTrack::Waves => "waves",
            AmbientTrack::Forest => "forest",
            AmbientTrack::Rain => "rain",
        }
    }

    const fn index(self) -> usize {
        match self {
            AmbientTrack::Waves => 0,
            AmbientTrack::Forest => 1,
            AmbientTrack::Rain => 2,
        }
    }
}

impl fmt::Display for AmbientTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmbientTrack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AmbientTrack::ALL
            .into_iter()
            .find(|track| track.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown ambient track '{}'", s))
    }
}

// ============================================================================
// AmbientMixer
// ============================================================================

/// Plays at most one ambient track at a time.
pub struct AmbientMixer {
    audio: AudioContext,
    /// One output per track, indexed in `AmbientTrack::ALL` order
    tracks: Vec<Arc<dyn AudioOutput>>,
    active: Option<AmbientTrack>,
    notifier: Notifier,
}

impl AmbientMixer {
    /// Creates a mixer with one idle output per track.
    pub fn new(audio: AudioContext, notifier: Notifier) -> Self {
        let tracks = AmbientTrack::ALL
            .into_iter()
            .map(|_| audio.create_output())
            .collect();

        Self {
            audio,
            tracks,
            active: None,
            notifier,
        }
    }

    /// Toggles a track.
    ///
    /// Toggling the active track stops it. Toggling any other track stops
    /// whatever plays and starts the requested one, looped. A playback
    /// failure is logged and the track is still marked active.
    ///
    /// Returns the track active afterwards.
    pub fn toggle(&mut self, track: AmbientTrack) -> Option<AmbientTrack> {
        if self.active == Some(track) {
            self.output(track).stop();
            self.active = None;
            info!("Ambient track '{}' stopped", track);
            self.notifier.notify(Notification::SoundStopped { track });
            return None;
        }

        self.stop_all();

        let resource = self.audio.library().ambient(track);
        if let Err(e) = self.output(track).start(&resource, PlaybackMode::Looped) {
            warn!("Ambient track '{}' failed to play: {}", track, e);
        }
        self.active = Some(track);
        info!("Ambient track '{}' playing", track);
        self.notifier.notify(Notification::SoundPlaying { track });

        self.active
    }

    /// Stops and rewinds every track and clears the selection.
    pub fn stop_all(&mut self) {
        for output in &self.tracks {
            output.stop();
        }
        if let Some(track) = self.active.take() {
            debug!("Cleared active ambient track '{}'", track);
        }
    }

    /// Returns the active track.
    pub fn active(&self) -> Option<AmbientTrack> {
        self.active
    }

    /// Returns how many track outputs are producing sound.
    pub fn playing_count(&self) -> usize {
        self.tracks
            .iter()
            .filter(|output| output.is_active())
            .count()
    }

    fn output(&self, track: AmbientTrack) -> &Arc<dyn AudioOutput> {
        &self.tracks[track.index()]
    }
}

impl Drop for AmbientMixer {
    fn drop(&mut self) {
        self.stop_all();
    }
}

impl fmt::Debug for AmbientMixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmbientMixer")
            .field("active", &self.active)
            .field("playing", &self.playing_count())
            .finish_non_exhaustive()
    }
}
