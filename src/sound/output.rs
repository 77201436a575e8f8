//! Audio output capability.
//!
//! Every component that makes noise (the countdown alarm, the alert player,
//! the ambient mixer) goes through the same two traits:
//!
//! - [`AudioBackend`] creates outputs.
//! - [`AudioOutput`] is one playable instance: `start`, `stop`, `is_active`.
//!
//! Components own at most one active output per exclusivity rule and always
//! stop the previous instance before starting a new one.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, warn};

use super::error::SoundError;
use super::source::{SoundLibrary, SoundResource};

// ============================================================================
// Traits
// ============================================================================

/// How a resource is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Play to the end once
    Once,
    /// Repeat until stopped
    Looped,
}

/// A single playable audio instance.
pub trait AudioOutput: Send + Sync {
    /// Starts playing `resource`, replacing anything this output was playing.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be opened, decoded or played.
    fn start(&self, resource: &SoundResource, mode: PlaybackMode) -> Result<(), SoundError>;

    /// Stops playback and rewinds. Stopping an idle output does nothing.
    fn stop(&self);

    /// Returns true while sound is being produced.
    fn is_active(&self) -> bool;
}

/// Factory for audio outputs.
pub trait AudioBackend: Send + Sync {
    /// Creates a new idle output.
    fn create_output(&self) -> Arc<dyn AudioOutput>;

    /// Returns a short backend name for logs.
    fn name(&self) -> &'static str;
}

// ============================================================================
// AudioContext
// ============================================================================

/// Backend plus resource resolution, shared by every sound owner.
#[derive(Clone)]
pub struct AudioContext {
    backend: Arc<dyn AudioBackend>,
    library: SoundLibrary,
}

impl AudioContext {
    /// Creates a context.
    pub fn new(backend: Arc<dyn AudioBackend>, library: SoundLibrary) -> Self {
        Self { backend, library }
    }

    /// Creates a context that never produces sound.
    pub fn silent() -> Self {
        Self::new(Arc::new(SilentBackend), SoundLibrary::default())
    }

    /// Returns the resource library.
    pub fn library(&self) -> &SoundLibrary {
        &self.library
    }

    /// Creates an idle output on the backend.
    pub fn create_output(&self) -> Arc<dyn AudioOutput> {
        self.backend.create_output()
    }

    /// Creates an output and starts `resource` on it.
    ///
    /// The output is returned even when starting fails, so the caller still
    /// owns and can later stop it. The failure is logged here.
    pub fn start(
        &self,
        resource: &SoundResource,
        mode: PlaybackMode,
    ) -> (Arc<dyn AudioOutput>, Result<(), SoundError>) {
        let output = self.create_output();
        let result = output.start(resource, mode);
        match &result {
            Err(e) if e.is_device_error() => error!(
                "Audio device lost while playing '{}' on {}: {} ({})",
                resource.name(),
                self.backend.name(),
                e,
                e.suggestion()
            ),
            Err(e) => warn!(
                "Failed to play '{}' on {}: {} ({})",
                resource.name(),
                self.backend.name(),
                e,
                e.suggestion()
            ),
            Ok(()) => {}
        }
        (output, result)
    }
}

impl fmt::Debug for AudioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioContext")
            .field("backend", &self.backend.name())
            .field("library", &self.library)
            .finish()
    }
}

// ============================================================================
// SilentBackend
// ============================================================================

/// Backend used when audio is disabled or unavailable.
///
/// Outputs track whether they were started so the rest of the system behaves
/// the same with or without speakers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentBackend;

#[derive(Debug, Default)]
struct SilentOutput {
    active: AtomicBool,
}

impl AudioOutput for SilentOutput {
    fn start(&self, resource: &SoundResource, _mode: PlaybackMode) -> Result<(), SoundError> {
        debug!("Silent playback of '{}'", resource.name());
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl AudioBackend for SilentBackend {
    fn create_output(&self) -> Arc<dyn AudioOutput> {
        Arc::new(SilentOutput::default())
    }

    fn name(&self) -> &'static str {
        "silent"
    }
}

// ============================================================================
// Mock
// ============================================================================

/// Output created by [`MockAudioBackend`], recording every call.
#[derive(Debug, Default)]
pub struct MockOutput {
    starts: Mutex<Vec<(SoundResource, PlaybackMode)>>,
    active: AtomicBool,
    stop_count: AtomicUsize,
    should_fail: Arc<AtomicBool>,
}

impl MockOutput {
    /// Returns every resource passed to `start`, in order.
    #[must_use]
    pub fn starts(&self) -> Vec<(SoundResource, PlaybackMode)> {
        self.starts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recently started resource.
    #[must_use]
    pub fn last_resource(&self) -> Option<SoundResource> {
        self.starts().pop().map(|(resource, _)| resource)
    }

    /// Returns how many times `stop` was called.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }
}

impl AudioOutput for MockOutput {
    fn start(&self, resource: &SoundResource, mode: PlaybackMode) -> Result<(), SoundError> {
        self.starts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((resource.clone(), mode));
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::FileNotFound(
                resource.path().display().to_string(),
            ));
        }
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Mock backend for testing.
#[derive(Debug, Default)]
pub struct MockAudioBackend {
    outputs: Mutex<Vec<Arc<MockOutput>>>,
    should_fail: Arc<AtomicBool>,
}

impl MockAudioBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `start` fail with `FileNotFound`.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Returns every output created so far.
    #[must_use]
    pub fn outputs(&self) -> Vec<Arc<MockOutput>> {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recently created output.
    #[must_use]
    pub fn last_output(&self) -> Option<Arc<MockOutput>> {
        self.outputs().pop()
    }

    /// Returns how many outputs are currently active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.outputs().iter().filter(|o| o.is_active()).count()
    }
}

impl AudioBackend for MockAudioBackend {
    fn create_output(&self) -> Arc<dyn AudioOutput> {
        let output = Arc::new(MockOutput {
            should_fail: Arc::clone(&self.should_fail),
            ..MockOutput::default()
        });
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&output));
        output
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
