//! Audio backend implementation using rodio.
//!
//! [`AudioDevice`] opens the default output stream and must stay alive for
//! as long as anything plays. [`RodioBackend`] only holds the stream handle,
//! so it can be shared freely. Each [`RodioOutput`] owns at most one sink.

use std::fs::File;
use std::io::BufReader;
use std::sync::{Arc, Mutex, PoisonError};

use rodio::{Decoder, OutputStream, OutputStreamHandle, PlayError, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::output::{AudioBackend, AudioOutput, PlaybackMode, SilentBackend};
use super::source::SoundResource;

// ============================================================================
// AudioDevice
// ============================================================================

/// The default audio output device.
///
/// Dropping the device ends all playback started through its backend.
pub struct AudioDevice {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    backend: Arc<RodioBackend>,
}

impl AudioDevice {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn open() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            backend: Arc::new(RodioBackend { stream_handle }),
        })
    }

    /// Returns the backend bound to this device.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn AudioBackend> {
        self.backend.clone()
    }
}

impl std::fmt::Debug for AudioDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDevice").finish_non_exhaustive()
    }
}

/// Opens the audio device, falling back to silence.
///
/// With `disabled` set, or when no device can be opened, the returned device
/// is `None` and the backend is a [`SilentBackend`]. Keep the device alive
/// for the lifetime of the backend.
#[must_use]
pub fn open_backend(disabled: bool) -> (Option<AudioDevice>, Arc<dyn AudioBackend>) {
    if disabled {
        debug!("Sound disabled, using silent backend");
        return (None, Arc::new(SilentBackend));
    }

    match AudioDevice::open() {
        Ok(device) => {
            let backend = device.backend();
            (Some(device), backend)
        }
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            (None, Arc::new(SilentBackend))
        }
    }
}

// ============================================================================
// RodioBackend
// ============================================================================

/// Backend creating rodio sinks on a shared output stream.
pub struct RodioBackend {
    stream_handle: OutputStreamHandle,
}

impl AudioBackend for RodioBackend {
    fn create_output(&self) -> Arc<dyn AudioOutput> {
        Arc::new(RodioOutput {
            stream_handle: self.stream_handle.clone(),
            sink: Mutex::new(None),
        })
    }

    fn name(&self) -> &'static str {
        "rodio"
    }
}

// ============================================================================
// RodioOutput
// ============================================================================

/// One playable instance backed by a rodio sink.
pub struct RodioOutput {
    stream_handle: OutputStreamHandle,
    sink: Mutex<Option<Sink>>,
}

impl RodioOutput {
    fn open_decoder(resource: &SoundResource) -> Result<Decoder<BufReader<File>>, SoundError> {
        let path = resource.path();
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
    }
}

impl AudioOutput for RodioOutput {
    fn start(&self, resource: &SoundResource, mode: PlaybackMode) -> Result<(), SoundError> {
        self.stop();

        let decoder = Self::open_decoder(resource)?;
        let sink = Sink::try_new(&self.stream_handle).map_err(sink_error)?;

        match mode {
            PlaybackMode::Once => sink.append(decoder),
            PlaybackMode::Looped => sink.append(decoder.repeat_infinite()),
        }

        debug!("Playing '{}' ({:?})", resource.name(), mode);
        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(sink);
        Ok(())
    }

    fn stop(&self) {
        let sink = self
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sink) = sink {
            sink.stop();
            debug!("Sound playback stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|sink| !sink.empty() && !sink.is_paused())
    }
}

/// Maps a sink creation failure. A vanished stream is a device problem.
fn sink_error(e: PlayError) -> SoundError {
    match e {
        PlayError::NoDevice => SoundError::DeviceNotAvailable(e.to_string()),
        other => SoundError::PlaybackError(other.to_string()),
    }
}

impl std::fmt::Debug for RodioOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioOutput")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
