//! CLI module for the focus timer.
//!
//! This module provides the terminal front-end:
//! - `commands`: Process and interactive command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `app`: The interactive session loop

pub mod app;
pub mod commands;
pub mod display;

pub use app::{prepare_settings, Flow, Session, SettingsFile};
pub use commands::{Cli, Commands, ReplCommand, RunArgs};
pub use display::Display;
