//! Interactive timer session.
//!
//! Ties the engine, the alert player and the ambient mixer to typed input.
//! One `tokio::select!` loop consumes input lines, countdown ticks and
//! Ctrl-C; notifications produced while handling any of them are printed
//! afterwards as toasts.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::commands::{ReplCommand, RunArgs};
use super::display::Display;
use crate::engine::{CountdownEngine, IntervalTickScheduler, Tick};
use crate::notification::{Notification, Notifier};
use crate::settings::{
    default_settings_path, load_settings, save_settings, SessionStore, SettingsHandle,
};
use crate::sound::{AlertPlayer, AmbientMixer, AudioContext, SoundError};
use crate::types::{Mode, TimerStatus, SECONDS_PER_MINUTE};

// ============================================================================
// SettingsFile
// ============================================================================

/// The settings file and the preferences it currently holds.
///
/// Command-line overrides live only in the session; interactive edits are
/// applied here as well and written back.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
    store: SessionStore,
}

impl SettingsFile {
    /// Loads `path`, using defaults when the file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = load_settings(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;
        Ok(Self { path, store })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Applies `edit` to the stored preferences and saves them.
    pub fn update(
        &mut self,
        edit: impl FnOnce(&mut SessionStore) -> crate::settings::Result<()>,
    ) -> Result<()> {
        edit(&mut self.store)?;
        save_settings(&self.path, &self.store)
            .with_context(|| format!("Failed to save settings to {}", self.path.display()))
    }
}

/// Builds the session store from the settings file and command-line flags.
///
/// Without `--settings`, the default path is used when a home directory
/// exists; otherwise preferences are kept in memory only.
pub fn prepare_settings(args: &RunArgs) -> Result<(SettingsHandle, Option<SettingsFile>)> {
    let path = match &args.settings {
        Some(path) => Some(path.clone()),
        None => match default_settings_path() {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Preferences will not be saved: {}", e);
                None
            }
        },
    };

    let file = path.map(SettingsFile::load).transpose()?;
    let mut store = file.as_ref().map(|f| f.store().clone()).unwrap_or_default();

    for (mode, minutes) in [
        (Mode::Work, args.work),
        (Mode::ShortRest, args.short_rest),
        (Mode::LongRest, args.long_rest),
    ] {
        if let Some(minutes) = minutes {
            store.durations.set_minutes(mode, minutes)?;
        }
    }
    if let Some(sound) = args.alert_sound {
        store.alert_sound = sound;
    }

    Ok((SettingsHandle::new(store), file))
}

// ============================================================================
// Session
// ============================================================================

/// Whether the session keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive timer session.
pub struct Session {
    settings: SettingsHandle,
    file: Option<SettingsFile>,
    engine: CountdownEngine,
    alert: AlertPlayer,
    mixer: AmbientMixer,
    ticks: mpsc::UnboundedReceiver<Tick>,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

impl Session {
    /// Creates a session. Must be called inside a tokio runtime.
    pub fn new(settings: SettingsHandle, audio: AudioContext, file: Option<SettingsFile>) -> Self {
        let (scheduler, ticks) = IntervalTickScheduler::channel();
        let (notifier, notifications) = Notifier::channel();

        let engine = CountdownEngine::new(
            settings.clone(),
            audio.clone(),
            Box::new(scheduler),
            notifier.clone(),
        );
        let alert = AlertPlayer::new(audio.clone(), settings.clone());
        let mixer = AmbientMixer::new(audio, notifier);

        Self {
            settings,
            file,
            engine,
            alert,
            mixer,
            ticks,
            notifications,
        }
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn mixer(&self) -> &AmbientMixer {
        &self.mixer
    }

    pub fn alert(&self) -> &AlertPlayer {
        &self.alert
    }

    /// Executes one command.
    ///
    /// # Errors
    ///
    /// Returns an error only when saving preferences fails; the edit still
    /// applies to the running session.
    pub fn handle(&mut self, command: ReplCommand) -> Result<Flow> {
        debug!("Command: {:?}", command);
        match command {
            ReplCommand::Start => self.engine.start(),
            ReplCommand::Pause => self.engine.pause(),
            ReplCommand::Toggle => self.engine.toggle(),
            ReplCommand::Reset => self.engine.reset(),
            ReplCommand::Lap => {
                self.engine.record_lap();
            }
            ReplCommand::Ack => self.engine.acknowledge_alarm(),
            ReplCommand::Mode { mode } => {
                self.engine.switch_mode(mode);
                Display::show_remaining(&self.engine.snapshot());
            }
            ReplCommand::Ambient { track } => {
                self.mixer.toggle(track);
            }
            ReplCommand::Preview { sound } => {
                let result = match sound {
                    Some(sound) => self.alert.play(sound, true),
                    None => self.alert.play_selected(true),
                };
                Self::report_sound_error(result);
            }
            ReplCommand::Sound { sound } => {
                self.settings.set_alert_sound(sound);
                println!("Alert sound set to {}", sound.label());
                Self::report_sound_error(self.alert.play(sound, true));
                self.persist(|store| {
                    store.alert_sound = sound;
                    Ok(())
                })?;
            }
            ReplCommand::Duration { mode, minutes } => {
                self.settings.set_duration(mode, minutes)?;
                println!(
                    "{} duration set to {} minutes (applies on reset)",
                    mode.label(),
                    minutes
                );
                self.persist(|store| store.durations.set_minutes(mode, minutes))?;
            }
            ReplCommand::Status => Display::show_status(&self.engine.snapshot()),
            ReplCommand::Json => {
                let json = serde_json::to_string_pretty(&self.engine.snapshot())
                    .context("Failed to serialize session")?;
                println!("{}", json);
            }
            ReplCommand::Laps => Display::show_laps(self.engine.laps()),
            ReplCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Forwards a tick to the engine and prints whole minutes.
    pub fn on_tick(&mut self, tick: Tick) {
        self.engine.on_tick(tick);

        let snapshot = self.engine.snapshot();
        if snapshot.status == TimerStatus::Running
            && snapshot.remaining_seconds % SECONDS_PER_MINUTE == 0
        {
            Display::show_remaining(&snapshot);
        }
    }

    /// Prints every pending notification.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            Display::show_notification(&notification);
            drained.push(notification);
        }
        drained
    }

    fn persist(
        &mut self,
        edit: impl FnOnce(&mut SessionStore) -> crate::settings::Result<()>,
    ) -> Result<()> {
        match &mut self.file {
            Some(file) => file.update(edit),
            None => Ok(()),
        }
    }

    fn report_sound_error(result: Result<(), SoundError>) {
        if let Err(e) = result {
            Display::show_error(&format!("{} ({})", e, e.suggestion()));
        }
    }

    /// Runs the session until `quit`, end of input or Ctrl-C.
    pub async fn run(mut self) -> Result<()> {
        let mut lines = spawn_line_reader();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        Display::show_remaining(&self.engine.snapshot());
        println!("Type `help` for commands.");

        loop {
            tokio::select! {
                line = lines.recv() => {
                    let Some(line) = line else {
                        debug!("End of input");
                        break;
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match ReplCommand::parse_line(line) {
                        Ok(command) => match self.handle(command) {
                            Ok(Flow::Quit) => break,
                            Ok(Flow::Continue) => {}
                            Err(e) => Display::show_error(&format!("{:#}", e)),
                        },
                        Err(message) => println!("{}", message.trim_end()),
                    }
                }
                Some(tick) = self.ticks.recv() => self.on_tick(tick),
                result = &mut ctrl_c => {
                    if let Err(e) = result {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                    }
                    info!("Interrupted");
                    break;
                }
            }
            self.drain_notifications();
        }

        self.drain_notifications();
        info!("Session ended");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("mixer", &self.mixer)
            .finish_non_exhaustive()
    }
}

/// Reads stdin on its own thread.
///
/// A blocking read cannot be cancelled, so the thread is detached and the
/// channel closes at end of input.
fn spawn_line_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AlertSound;
    use crate::sound::{AmbientTrack, MockAudioBackend, SoundLibrary};
    use std::sync::Arc;

    fn create_session(file: Option<SettingsFile>) -> (Session, Arc<MockAudioBackend>) {
        let backend = Arc::new(MockAudioBackend::new());
        let audio = AudioContext::new(backend.clone(), SoundLibrary::new("assets"));
        let settings = SettingsHandle::new(
            file.as_ref().map(|f| f.store().clone()).unwrap_or_default(),
        );
        (Session::new(settings, audio, file), backend)
    }

    fn kinds(notifications: &[Notification]) -> Vec<&'static str> {
        notifications.iter().map(|n| n.kind()).collect()
    }

    mod prepare_tests {
        use super::*;

        #[test]
        fn test_flags_override_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("settings.json");
            std::fs::write(&path, r#"{"durations":{"work_minutes":40}}"#).unwrap();

            let args = RunArgs {
                short_rest: Some(7),
                alert_sound: Some(AlertSound::Chicken),
                settings: Some(path),
                ..RunArgs::default()
            };
            let (settings, file) = prepare_settings(&args).unwrap();

            assert_eq!(settings.duration_seconds(Mode::Work), 40 * 60);
            assert_eq!(settings.duration_seconds(Mode::ShortRest), 7 * 60);
            assert_eq!(settings.alert_sound(), AlertSound::Chicken);
            // The file keeps its own values.
            assert_eq!(file.unwrap().store().durations.short_rest_minutes, 5);
        }

        #[test]
        fn test_invalid_file_is_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("settings.json");
            std::fs::write(&path, r#"{"durations":{"work_minutes":0}}"#).unwrap();

            let args = RunArgs {
                settings: Some(path),
                ..RunArgs::default()
            };
            let err = prepare_settings(&args).unwrap_err();
            assert!(format!("{:#}", err).contains("Failed to load settings"));
        }
    }

    mod command_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_start_lap_duplicate() {
            let (mut session, _backend) = create_session(None);

            session.handle(ReplCommand::Start).unwrap();
            session.handle(ReplCommand::Lap).unwrap();
            session.handle(ReplCommand::Lap).unwrap();

            assert_eq!(
                kinds(&session.drain_notifications()),
                ["started", "lap-recorded", "duplicate-lap"]
            );
            assert_eq!(session.engine().laps(), ["25:00"]);
        }

        #[tokio::test(start_paused = true)]
        async fn test_ticks_from_interval_driver() {
            let (mut session, _backend) = create_session(None);
            session.handle(ReplCommand::Start).unwrap();

            for _ in 0..3 {
                let tick = session.ticks.recv().await.unwrap();
                session.on_tick(tick);
            }
            assert_eq!(session.engine().remaining_seconds(), 1497);
        }

        #[tokio::test(start_paused = true)]
        async fn test_ambient_toggle() {
            let (mut session, _backend) = create_session(None);

            session
                .handle(ReplCommand::Ambient {
                    track: AmbientTrack::Rain,
                })
                .unwrap();
            session
                .handle(ReplCommand::Ambient {
                    track: AmbientTrack::Forest,
                })
                .unwrap();

            assert_eq!(session.mixer().active(), Some(AmbientTrack::Forest));
            assert_eq!(session.mixer().playing_count(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_preview_defaults_to_selected_sound() {
            let (mut session, backend) = create_session(None);
            session.settings.set_alert_sound(AlertSound::Chime);

            session.handle(ReplCommand::Preview { sound: None }).unwrap();

            let resource = backend.last_output().unwrap().last_resource().unwrap();
            assert_eq!(resource.name(), "chime");
            assert!(session.alert().is_playing());
        }

        #[tokio::test(start_paused = true)]
        async fn test_quit() {
            let (mut session, _backend) = create_session(None);
            assert_eq!(session.handle(ReplCommand::Quit).unwrap(), Flow::Quit);
        }
    }

    mod persistence_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_sound_selection_is_saved() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("settings.json");
            let file = SettingsFile::load(&path).unwrap();
            let (mut session, _backend) = create_session(Some(file));

            session
                .handle(ReplCommand::Sound {
                    sound: AlertSound::Alert,
                })
                .unwrap();

            assert_eq!(session.settings.alert_sound(), AlertSound::Alert);
            assert_eq!(load_settings(&path).unwrap().alert_sound, AlertSound::Alert);
        }

        #[tokio::test(start_paused = true)]
        async fn test_duration_edit_saved_and_applied_on_reset() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("settings.json");
            let file = SettingsFile::load(&path).unwrap();
            let (mut session, _backend) = create_session(Some(file));

            session
                .handle(ReplCommand::Duration {
                    mode: Mode::Work,
                    minutes: 45,
                })
                .unwrap();
            assert_eq!(session.engine().remaining_seconds(), 1500);

            session.handle(ReplCommand::Reset).unwrap();
            assert_eq!(session.engine().remaining_seconds(), 2700);
            assert_eq!(load_settings(&path).unwrap().durations.work_minutes, 45);
        }
    }
}
