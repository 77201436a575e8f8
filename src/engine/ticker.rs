//! Tick drivers for the countdown.
//!
//! A driver is a scheduled task that produces one [`Tick`] per second until
//! its [`TaskGuard`] is dropped. Ticks are tagged with the generation of the
//! driver that produced them so the engine can discard ticks left in the
//! channel by a driver it already cancelled.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

use crate::task::TaskGuard;

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One countdown step produced by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Generation of the driver that produced the tick
    pub generation: u64,
}

/// Schedules tick drivers.
pub trait TickScheduler: Send {
    /// Starts a driver for `generation`. Dropping the guard stops it.
    fn schedule(&self, generation: u64) -> TaskGuard;
}

// ============================================================================
// IntervalTickScheduler
// ============================================================================

/// Production scheduler backed by `tokio::time::interval`.
#[derive(Debug, Clone)]
pub struct IntervalTickScheduler {
    tx: mpsc::UnboundedSender<Tick>,
    period: Duration,
}

impl IntervalTickScheduler {
    /// Creates a scheduler ticking once per second into `tx`.
    pub fn new(tx: mpsc::UnboundedSender<Tick>) -> Self {
        Self::with_period(tx, TICK_PERIOD)
    }

    /// Creates a scheduler with a custom period.
    pub fn with_period(tx: mpsc::UnboundedSender<Tick>, period: Duration) -> Self {
        Self { tx, period }
    }

    /// Creates a scheduler together with the receiving end of its ticks.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl TickScheduler for IntervalTickScheduler {
    fn schedule(&self, generation: u64) -> TaskGuard {
        let tx = self.tx.clone();
        let period = self.period;

        debug!("Scheduling tick driver #{}", generation);
        TaskGuard::spawn(async move {
            // The first tick lands one full period after start.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    debug!("Tick receiver closed, driver #{} exiting", generation);
                    break;
                }
            }
        })
    }
}

// ============================================================================
// ManualTickScheduler
// ============================================================================

#[derive(Debug, Default)]
struct ManualState {
    active: usize,
    scheduled: usize,
    last_generation: Option<u64>,
}

/// Scheduler that never ticks on its own.
///
/// Tests feed [`Tick`] values to the engine directly and use this scheduler
/// to observe how many drivers are alive.
#[derive(Debug, Clone, Default)]
pub struct ManualTickScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many drivers are currently held.
    #[must_use]
    pub fn active_drivers(&self) -> usize {
        self.lock().active
    }

    /// Returns how many drivers were ever scheduled.
    #[must_use]
    pub fn scheduled_count(&self) -> usize {
        self.lock().scheduled
    }

    /// Returns the generation of the most recently scheduled driver.
    #[must_use]
    pub fn last_generation(&self) -> Option<u64> {
        self.lock().last_generation
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule(&self, generation: u64) -> TaskGuard {
        {
            let mut state = self.lock();
            state.active += 1;
            state.scheduled += 1;
            state.last_generation = Some(generation);
        }

        let state = Arc::clone(&self.state);
        TaskGuard::on_drop(move || {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            state.active = state.active.saturating_sub(1);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod interval_tests {
        use super::*;
        use tokio::time::advance;

        #[tokio::test(start_paused = true)]
        async fn test_first_tick_after_one_period() {
            let (scheduler, mut rx) = IntervalTickScheduler::channel();
            let _guard = scheduler.schedule(7);

            tokio::task::yield_now().await;
            assert!(rx.try_recv().is_err(), "no immediate tick");

            advance(Duration::from_millis(1001)).await;
            tokio::task::yield_now().await;
            assert_eq!(rx.try_recv().unwrap(), Tick { generation: 7 });
        }

        #[tokio::test(start_paused = true)]
        async fn test_ticks_every_period() {
            let (scheduler, mut rx) = IntervalTickScheduler::channel();
            let _guard = scheduler.schedule(1);

            for _ in 0..3 {
                rx.recv().await.unwrap();
            }
            assert!(rx.try_recv().is_err());
        }

        #[tokio::test(start_paused = true)]
        async fn test_dropping_guard_stops_ticks() {
            let (scheduler, mut rx) = IntervalTickScheduler::channel();
            let guard = scheduler.schedule(1);

            assert_eq!(rx.recv().await.unwrap().generation, 1);
            drop(guard);

            advance(Duration::from_secs(5)).await;
            tokio::task::yield_now().await;
            assert!(rx.try_recv().is_err());
        }
    }

    mod manual_tests {
        use super::*;

        #[test]
        fn test_counts_live_guards() {
            let scheduler = ManualTickScheduler::new();

            let first = scheduler.schedule(1);
            let second = scheduler.schedule(2);
            assert_eq!(scheduler.active_drivers(), 2);
            assert_eq!(scheduler.last_generation(), Some(2));

            drop(first);
            assert_eq!(scheduler.active_drivers(), 1);
            second.cancel();
            assert_eq!(scheduler.active_drivers(), 0);
            assert_eq!(scheduler.scheduled_count(), 2);
        }
    }
}
