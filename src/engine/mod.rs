//! Countdown engine and its tick drivers.
//!
//! The engine is driven synchronously: the front-end calls transitions and
//! forwards [`Tick`] messages from the scheduler's channel. The engine holds
//! at most one driver guard, so leaving `Running` always cancels the driver.

mod countdown;
mod laps;
mod ticker;

pub use countdown::{AlarmState, CountdownEngine};
pub use laps::{LapLedger, LapOutcome};
pub use ticker::{IntervalTickScheduler, ManualTickScheduler, Tick, TickScheduler, TICK_PERIOD};
