//! Alert sound player.
//!
//! Plays the selectable alert sounds outside of an alarm, typically as a
//! preview when the user picks a sound. Only one instance started by the
//! player is active at a time.

use std::fmt;
use std::sync::{Arc, Weak};

use tokio::time::{sleep, Duration};
use tracing::debug;

use super::error::SoundError;
use super::output::{AudioContext, AudioOutput, PlaybackMode};
use crate::settings::{AlertSound, SettingsHandle};
use crate::task::TaskGuard;

/// How long a preview plays before it is stopped.
pub const PREVIEW_WINDOW: Duration = Duration::from_secs(2);

/// The instance the player last started.
enum Current {
    /// Kept until stopped or superseded.
    Held(Arc<dyn AudioOutput>),
    /// Owned by the auto-stop task; released when the window closes.
    Preview {
        output: Weak<dyn AudioOutput>,
        _auto_stop: TaskGuard,
    },
}

/// Plays alert sounds one at a time.
pub struct AlertPlayer {
    audio: AudioContext,
    settings: SettingsHandle,
    current: Option<Current>,
}

impl AlertPlayer {
    /// Creates a player reading the selected sound from `settings`.
    pub fn new(audio: AudioContext, settings: SettingsHandle) -> Self {
        Self {
            audio,
            settings,
            current: None,
        }
    }

    /// Plays `sound`, stopping whatever this player started before.
    ///
    /// With `preview_only`, playback is stopped automatically after
    /// [`PREVIEW_WINDOW`]. Must be called inside a tokio runtime in that case.
    ///
    /// # Errors
    ///
    /// Returns the playback error. It has already been logged; the previous
    /// instance is stopped either way.
    pub fn play(&mut self, sound: AlertSound, preview_only: bool) -> Result<(), SoundError> {
        self.stop();

        let resource = self.audio.library().alert(sound);
        let (output, result) = self.audio.start(&resource, PlaybackMode::Once);

        self.current = Some(if preview_only {
            debug!("Previewing alert sound '{}'", sound);
            let weak = Arc::downgrade(&output);
            let auto_stop = TaskGuard::spawn(async move {
                sleep(PREVIEW_WINDOW).await;
                output.stop();
                debug!("Preview window closed");
            });
            Current::Preview {
                output: weak,
                _auto_stop: auto_stop,
            }
        } else {
            debug!("Playing alert sound '{}'", sound);
            Current::Held(output)
        });

        result
    }

    /// Plays the alert sound currently selected in the session store.
    pub fn play_selected(&mut self, preview_only: bool) -> Result<(), SoundError> {
        let sound = self.settings.alert_sound();
        self.play(sound, preview_only)
    }

    /// Stops the current instance, if any.
    pub fn stop(&mut self) {
        match self.current.take() {
            Some(Current::Held(output)) => output.stop(),
            Some(Current::Preview {
                output,
                _auto_stop: auto_stop,
            }) => {
                if let Some(output) = output.upgrade() {
                    output.stop();
                }
                auto_stop.cancel();
            }
            None => {}
        }
    }

    /// Returns true while the current instance produces sound.
    pub fn is_playing(&self) -> bool {
        match &self.current {
            Some(Current::Held(output)) => output.is_active(),
            Some(Current::Preview { output, .. }) => {
                output.upgrade().is_some_and(|output| output.is_active())
            }
            None => false,
        }
    }
}

impl Drop for AlertPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for AlertPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertPlayer")
            .field("playing", &self.is_playing())
            .finish_non_exhaustive()
    }
}
