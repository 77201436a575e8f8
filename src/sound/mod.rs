//! Sound playback for the focus timer.
//!
//! Three independent owners make noise, each through the same capability:
//!
//! - the countdown alarm (looped alert sound, see `engine`)
//! - [`AlertPlayer`] for one-shot alert sounds and 2-second previews
//! - [`AmbientMixer`] for looping background tracks
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │  Countdown   │  │ AlertPlayer  │  │ AmbientMixer │
//! └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!        └─────────────────┼─────────────────┘
//!                          ▼
//!                 ┌──────────────────┐     ┌──────────────┐
//!                 │   AudioContext   │────▶│ SoundLibrary │
//!                 └────────┬─────────┘     └──────────────┘
//!                          ▼
//!                 ┌──────────────────┐
//!                 │   AudioBackend   │  rodio / silent / mock
//!                 └──────────────────┘
//! ```
//!
//! Playback failures never reach the timer state machine. They are logged
//! and the owner keeps going as if the sound had played.
//!
//! # Usage
//!
//! ```rust,no_run
//! use focus_timer::settings::SettingsHandle;
//! use focus_timer::sound::{open_backend, AlertPlayer, AudioContext, SoundLibrary};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (_device, backend) = open_backend(false);
//! let audio = AudioContext::new(backend, SoundLibrary::new("assets"));
//!
//! let mut player = AlertPlayer::new(audio, SettingsHandle::default());
//! if let Err(e) = player.play_selected(true) {
//!     eprintln!("Could not play sound: {}", e);
//! }
//! # }
//! ```

mod alert;
mod ambient;
mod error;
mod output;
mod player;
mod source;

pub use alert::{AlertPlayer, PREVIEW_WINDOW};
pub use ambient::{AmbientMixer, AmbientTrack};
pub use error::SoundError;
pub use output::{
    AudioBackend, AudioContext, AudioOutput, MockAudioBackend, MockOutput, PlaybackMode,
    SilentBackend,
};
pub use player::{open_backend, AudioDevice, RodioBackend, RodioOutput};
pub use source::{SoundLibrary, SoundResource, DEFAULT_ASSET_ROOT};
