//! Countdown engine for the focus timer.
//!
//! This module provides the per-mode timer state machine:
//! - State transitions (Stopped → Running → Alarming → Stopped)
//! - A remaining-time ledger with one frozen entry per mode
//! - Lap recording with duplicate suppression
//! - Alarm lifecycle (looped alert sound held until acknowledged)

use std::fmt;
use std::mem;
use std::sync::Arc;

use tracing::{debug, info};

use super::laps::{LapLedger, LapOutcome};
use super::ticker::{Tick, TickScheduler};
use crate::notification::{Notification, Notifier};
use crate::settings::SettingsHandle;
use crate::sound::{AudioContext, AudioOutput, PlaybackMode};
use crate::task::TaskGuard;
use crate::types::{
    format_time, Ledger, Mode, SessionSnapshot, TimerStatus, ALMOST_DONE_SECONDS,
};

// ============================================================================
// AlarmState
// ============================================================================

/// Alarm lifecycle.
pub enum AlarmState {
    /// No alarm sounding
    Idle,
    /// The alarm owns a looping output until acknowledged or reset
    Sounding(Arc<dyn AudioOutput>),
}

impl AlarmState {
    /// Returns true while the alarm is sounding.
    pub fn is_sounding(&self) -> bool {
        matches!(self, AlarmState::Sounding(_))
    }

    /// Stops and releases the alarm output. Returns true if one was sounding.
    fn silence(&mut self) -> bool {
        match mem::replace(self, AlarmState::Idle) {
            AlarmState::Sounding(output) => {
                output.stop();
                true
            }
            AlarmState::Idle => false,
        }
    }
}

impl fmt::Debug for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmState::Idle => f.write_str("Idle"),
            AlarmState::Sounding(output) => f
                .debug_tuple("Sounding")
                .field(&output.is_active())
                .finish(),
        }
    }
}

// ============================================================================
// CountdownEngine
// ============================================================================

/// The tick driver currently held by the engine.
struct Driver {
    generation: u64,
    _guard: TaskGuard,
}

/// Countdown engine that owns the timer session.
pub struct CountdownEngine {
    settings: SettingsHandle,
    audio: AudioContext,
    scheduler: Box<dyn TickScheduler>,
    notifier: Notifier,
    /// Selected mode; its ledger entry is the live value
    mode: Mode,
    ledger: Ledger,
    laps: LapLedger,
    alarm: AlarmState,
    driver: Option<Driver>,
    next_generation: u64,
}

impl CountdownEngine {
    /// Creates an engine in `Stopped`, Work mode, seeded from `settings`.
    pub fn new(
        settings: SettingsHandle,
        audio: AudioContext,
        scheduler: Box<dyn TickScheduler>,
        notifier: Notifier,
    ) -> Self {
        let ledger = Self::seed(&settings);
        Self {
            settings,
            audio,
            scheduler,
            notifier,
            mode: Mode::default(),
            ledger,
            laps: LapLedger::new(),
            alarm: AlarmState::Idle,
            driver: None,
            next_generation: 1,
        }
    }

    fn seed(settings: &SettingsHandle) -> Ledger {
        Ledger::from_fn(|mode| settings.duration_seconds(mode))
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Starts the countdown for the selected mode.
    ///
    /// No-op while running, while the alarm sounds, or at zero remaining.
    pub fn start(&mut self) {
        if self.alarm.is_sounding() {
            debug!("Start ignored: alarm is sounding");
            return;
        }
        if self.driver.is_some() {
            debug!("Start ignored: already running");
            return;
        }
        if self.remaining_seconds() == 0 {
            debug!("Start ignored: no time remaining in {}", self.mode);
            return;
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.driver = Some(Driver {
            generation,
            _guard: self.scheduler.schedule(generation),
        });

        info!(
            "Countdown started: {} with {} remaining",
            self.mode,
            self.formatted_remaining()
        );
        self.notifier.notify(Notification::Started);
    }

    /// Pauses the countdown, keeping the remaining seconds.
    ///
    /// No-op unless running.
    pub fn pause(&mut self) {
        if self.driver.take().is_none() {
            debug!("Pause ignored: not running");
            return;
        }

        info!("Countdown paused at {}", self.formatted_remaining());
        self.notifier.notify(Notification::Paused);
    }

    /// Starts when stopped, pauses when running.
    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Restores every mode to its configured duration.
    ///
    /// Valid from any state: cancels the driver, silences the alarm and
    /// clears laps. Durations are read from the settings at this moment.
    pub fn reset(&mut self) {
        self.driver = None;
        if self.alarm.silence() {
            debug!("Alarm silenced by reset");
        }
        self.ledger = Self::seed(&self.settings);
        self.laps.clear();

        info!("Timer reset");
        self.notifier.notify(Notification::Reset);
    }

    /// Selects `mode`.
    ///
    /// The outgoing mode keeps its remaining seconds in the ledger. A running
    /// countdown is stopped without a notification. A sounding alarm keeps
    /// sounding. Laps are kept.
    pub fn switch_mode(&mut self, mode: Mode) {
        if self.driver.take().is_some() {
            debug!("Countdown stopped by mode switch");
        }

        if self.mode != mode {
            debug!(
                "Switching mode {} ({}) -> {} ({})",
                self.mode,
                self.formatted_remaining(),
                mode,
                format_time(self.ledger.get(mode))
            );
            self.mode = mode;
        }
    }

    /// Applies one countdown step.
    ///
    /// Ticks from any driver other than the one currently held are ignored.
    pub fn on_tick(&mut self, tick: Tick) {
        match &self.driver {
            Some(driver) if driver.generation == tick.generation => {}
            _ => {
                debug!("Ignoring stale tick from driver #{}", tick.generation);
                return;
            }
        }

        let remaining = self.remaining_seconds().saturating_sub(1);
        self.ledger.set(self.mode, remaining);

        if remaining == ALMOST_DONE_SECONDS {
            self.notifier.notify(Notification::AlmostDone);
        }

        if remaining == 0 {
            self.driver = None;
            self.sound_alarm();
        }
    }

    fn sound_alarm(&mut self) {
        let sound = self.settings.alert_sound();
        let resource = self.audio.library().alert(sound);
        // Failures are logged by the context; the alarm state is entered anyway.
        let (output, _) = self.audio.start(&resource, PlaybackMode::Looped);
        self.alarm = AlarmState::Sounding(output);

        info!("{} complete, alarm '{}' sounding", self.mode, sound);
        self.notifier.notify(Notification::Complete);
    }

    /// Stops the alarm. Remaining seconds stay at zero.
    ///
    /// No-op unless the alarm is sounding.
    pub fn acknowledge_alarm(&mut self) {
        if !self.alarm.silence() {
            debug!("Acknowledge ignored: no alarm sounding");
            return;
        }

        info!("Alarm acknowledged");
        self.notifier.notify(Notification::AlarmStopped);
    }

    /// Records the selected mode's remaining time as a lap.
    pub fn record_lap(&mut self) -> LapOutcome {
        let outcome = self.laps.record(self.formatted_remaining());
        match &outcome {
            LapOutcome::Recorded(lap) => {
                debug!("Lap recorded: {}", lap);
                self.notifier
                    .notify(Notification::LapRecorded { lap: lap.clone() });
            }
            LapOutcome::Duplicate(lap) => {
                debug!("Duplicate lap ignored: {}", lap);
                self.notifier
                    .notify(Notification::DuplicateLap { lap: lap.clone() });
            }
        }
        outcome
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns the selected mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the live remaining seconds of the selected mode.
    pub fn remaining_seconds(&self) -> u32 {
        self.ledger.get(self.mode)
    }

    /// Returns the remaining seconds recorded for any mode.
    pub fn remaining_for(&self, mode: Mode) -> u32 {
        self.ledger.get(mode)
    }

    /// Returns the remaining time as `MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        format_time(self.remaining_seconds())
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_some()
    }

    pub fn is_alarming(&self) -> bool {
        self.alarm.is_sounding()
    }

    /// Returns the derived status.
    pub fn status(&self) -> TimerStatus {
        if self.is_alarming() {
            TimerStatus::Alarming
        } else if self.is_running() {
            TimerStatus::Running
        } else {
            TimerStatus::Stopped
        }
    }

    /// Returns the recorded laps in insertion order.
    pub fn laps(&self) -> &[String] {
        self.laps.as_slice()
    }

    /// Returns a read-only view for presentation.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            status: self.status(),
            remaining_seconds: self.remaining_seconds(),
            remaining: self.formatted_remaining(),
            is_running: self.is_running(),
            alarm_active: self.is_alarming(),
            laps: self.laps.as_slice().to_vec(),
        }
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        self.driver = None;
        self.alarm.silence();
    }
}

impl fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("mode", &self.mode)
            .field("ledger", &self.ledger)
            .field("status", &self.status())
            .field("laps", &self.laps.len())
            .field("alarm", &self.alarm)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
