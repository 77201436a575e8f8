//! Command definitions for the focus timer.
//!
//! Uses clap derive for both the process arguments ([`Cli`]) and the lines
//! typed into an interactive session ([`ReplCommand`]).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::AlertSound;
use crate::sound::AmbientTrack;
use crate::types::{Mode, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};

// ============================================================================
// CLI Structure
// ============================================================================

/// Focus timer with per-mode countdowns, laps, alarms and ambient sound
#[derive(Parser, Debug)]
#[command(
    name = "focus-timer",
    version,
    about = "Terminal focus timer with work and rest modes",
    long_about = "An interactive countdown timer with Work, Short Rest and Long Rest modes.\n\
                  Type commands such as `start`, `lap` or `mode short` while it runs.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive timer session
    Run(RunArgs),

    /// List alert sounds and ambient tracks
    Sounds {
        /// Asset directory containing `sounds/` and `audio/`
        #[arg(long, value_name = "DIR")]
        assets: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command.
///
/// Duration and sound flags override the settings file for this session.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Work duration in minutes (1-180)
    #[arg(short, long, value_parser = duration_parser())]
    pub work: Option<u32>,

    /// Short rest duration in minutes (1-180)
    #[arg(short, long, value_parser = duration_parser())]
    pub short_rest: Option<u32>,

    /// Long rest duration in minutes (1-180)
    #[arg(short, long, value_parser = duration_parser())]
    pub long_rest: Option<u32>,

    /// Alert sound played when a countdown completes
    #[arg(short, long, value_enum)]
    pub alert_sound: Option<AlertSound>,

    /// Asset directory containing `sounds/` and `audio/`
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Settings file (defaults to ~/.focus-timer/settings.json)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Disable audio output
    #[arg(long)]
    pub no_sound: bool,
}

fn duration_parser() -> clap::builder::RangedI64ValueParser<u32> {
    let min = i64::from(MIN_DURATION_MINUTES);
    let max = i64::from(MAX_DURATION_MINUTES);
    clap::value_parser!(u32).range(min..=max)
}

// ============================================================================
// Interactive Commands
// ============================================================================

/// One line typed into an interactive session.
#[derive(Parser, Debug)]
#[command(
    name = "focus-timer",
    no_binary_name = true,
    disable_version_flag = true,
    override_usage = "<COMMAND> [ARGS]"
)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

/// Commands accepted by an interactive session.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start when stopped, pause when running
    Toggle,
    /// Restore every mode to its configured duration and clear laps
    Reset,
    /// Record the remaining time as a lap
    Lap,
    /// Stop the alarm
    #[command(alias = "stop-alarm")]
    Ack,
    /// Switch mode (work, short, long)
    Mode {
        #[arg(value_parser = clap::value_parser!(Mode))]
        mode: Mode,
    },
    /// Toggle an ambient track
    Ambient {
        #[arg(value_enum)]
        track: AmbientTrack,
    },
    /// Preview an alert sound (the selected one by default)
    Preview {
        #[arg(value_enum)]
        sound: Option<AlertSound>,
    },
    /// Select the alert sound and preview it
    Sound {
        #[arg(value_enum)]
        sound: AlertSound,
    },
    /// Set a mode's duration in minutes; applies on the next reset
    Duration {
        #[arg(value_parser = clap::value_parser!(Mode))]
        mode: Mode,
        #[arg(value_parser = duration_parser())]
        minutes: u32,
    },
    /// Show the timer status
    Status,
    /// Show the timer status as JSON
    Json,
    /// List recorded laps
    Laps,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

impl ReplCommand {
    /// Parses one input line.
    ///
    /// # Errors
    ///
    /// Returns a printable message for bad quoting, unknown commands or
    /// invalid arguments. `help` also comes back as an error carrying the
    /// help text.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let args = shlex::split(line).ok_or("error: Invalid quoting")?;
        ReplLine::try_parse_from(args)
            .map(|parsed| parsed.command)
            .map_err(|e| e.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["focus-timer"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["focus-timer", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_run_overrides() {
            let cli = Cli::parse_from([
                "focus-timer",
                "run",
                "--work",
                "50",
                "--short-rest",
                "10",
                "--alert-sound",
                "chime",
                "--assets",
                "/opt/sounds",
                "--no-sound",
            ]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert_eq!(args.work, Some(50));
                    assert_eq!(args.short_rest, Some(10));
                    assert_eq!(args.long_rest, None);
                    assert_eq!(args.alert_sound, Some(AlertSound::Chime));
                    assert_eq!(args.assets, Some(PathBuf::from("/opt/sounds")));
                    assert!(args.no_sound);
                }
                other => panic!("expected run, got {:?}", other),
            }
        }

        #[test]
        fn test_run_duration_range() {
            assert!(Cli::try_parse_from(["focus-timer", "run", "--work", "0"]).is_err());
            assert!(Cli::try_parse_from(["focus-timer", "run", "--work", "181"]).is_err());
            assert!(Cli::try_parse_from(["focus-timer", "run", "--work", "180"]).is_ok());
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["focus-timer", "completions", "bash"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Completions {
                    shell: clap_complete::Shell::Bash
                })
            ));
        }

        #[test]
        fn test_unknown_alert_sound_rejected() {
            assert!(
                Cli::try_parse_from(["focus-timer", "run", "--alert-sound", "gong"]).is_err()
            );
        }
    }

    // ------------------------------------------------------------------------
    // ReplCommand Tests
    // ------------------------------------------------------------------------

    mod repl_tests {
        use super::*;

        #[test]
        fn test_simple_commands() {
            assert_eq!(ReplCommand::parse_line("start"), Ok(ReplCommand::Start));
            assert_eq!(ReplCommand::parse_line("  lap "), Ok(ReplCommand::Lap));
            assert_eq!(ReplCommand::parse_line("exit"), Ok(ReplCommand::Quit));
            assert_eq!(ReplCommand::parse_line("stop-alarm"), Ok(ReplCommand::Ack));
        }

        #[test]
        fn test_mode_aliases() {
            assert_eq!(
                ReplCommand::parse_line("mode short"),
                Ok(ReplCommand::Mode {
                    mode: Mode::ShortRest
                })
            );
            assert_eq!(
                ReplCommand::parse_line("mode long-rest"),
                Ok(ReplCommand::Mode {
                    mode: Mode::LongRest
                })
            );
        }

        #[test]
        fn test_ambient_and_sounds() {
            assert_eq!(
                ReplCommand::parse_line("ambient rain"),
                Ok(ReplCommand::Ambient {
                    track: AmbientTrack::Rain
                })
            );
            assert_eq!(
                ReplCommand::parse_line("preview"),
                Ok(ReplCommand::Preview { sound: None })
            );
            assert_eq!(
                ReplCommand::parse_line("sound chicken"),
                Ok(ReplCommand::Sound {
                    sound: AlertSound::Chicken
                })
            );
        }

        #[test]
        fn test_duration() {
            assert_eq!(
                ReplCommand::parse_line("duration work 45"),
                Ok(ReplCommand::Duration {
                    mode: Mode::Work,
                    minutes: 45
                })
            );
            assert!(ReplCommand::parse_line("duration work 0").is_err());
        }

        #[test]
        fn test_errors() {
            assert!(ReplCommand::parse_line("launch").is_err());
            assert!(ReplCommand::parse_line("mode nap").is_err());
            assert!(ReplCommand::parse_line("mode \"work").is_err());
        }

        #[test]
        fn test_help_lists_commands() {
            let help = ReplCommand::parse_line("help").unwrap_err();
            assert!(help.contains("start"));
            assert!(help.contains("ambient"));
        }
    }
}
