//! End-to-end tests for the focus-timer binary.
//!
//! Sessions are scripted through stdin with audio disabled and a temporary
//! settings file, so nothing touches the user's home directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn focus_timer() -> Command {
    let mut cmd = Command::cargo_bin("focus-timer").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Runs an interactive session fed with `script`.
fn session(dir: &TempDir, extra: &[&str], script: &str) -> assert_cmd::assert::Assert {
    let settings = dir.path().join("settings.json");
    let mut cmd = focus_timer();
    cmd.arg("run")
        .arg("--no-sound")
        .arg("--settings")
        .arg(&settings)
        .args(extra)
        .write_stdin(script);
    cmd.assert()
}

// ============================================================================
// Commands
// ============================================================================

mod command_tests {
    use super::*;

    #[test]
    fn test_help_lists_subcommands() {
        focus_timer()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("run"))
            .stdout(predicate::str::contains("sounds"))
            .stdout(predicate::str::contains("completions"));
    }

    #[test]
    fn test_sounds_lists_catalog() {
        focus_timer()
            .args(["sounds", "--assets", "/nonexistent/focus-timer"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/nonexistent/focus-timer/sounds/bell.mp3"))
            .stdout(predicate::str::contains("/nonexistent/focus-timer/audio/rain.mp3"))
            .stdout(predicate::str::contains("(missing)"));
    }

    #[test]
    fn test_completions_for_bash() {
        focus_timer()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("focus-timer"));
    }

    #[test]
    fn test_out_of_range_duration_rejected() {
        focus_timer()
            .args(["run", "--work", "181"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("181"));
    }

    #[test]
    fn test_invalid_settings_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        std::fs::write(&settings, "{ not json").unwrap();

        focus_timer()
            .args(["run", "--no-sound", "--settings"])
            .arg(&settings)
            .write_stdin("quit\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to load settings"));
    }
}

// ============================================================================
// Interactive sessions
// ============================================================================

mod session_tests {
    use super::*;

    #[test]
    fn test_duplicate_lap_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        session(&dir, &[], "lap\nlap\nlaps\nquit\n")
            .success()
            .stdout(predicate::str::contains("[Lap Recorded] Lap time: 25:00"))
            .stdout(predicate::str::contains(
                "[Duplicate Lap Ignored] Lap 25:00 already exists",
            ))
            .stdout(predicate::str::contains("#1   25:00"))
            .stdout(predicate::str::contains("#2").not());
    }

    #[test]
    fn test_start_and_status() {
        let dir = tempfile::tempdir().unwrap();
        session(&dir, &["--work", "50"], "start\nstatus\n")
            .success()
            .stdout(predicate::str::contains("[Timer Started] Stay focused!"))
            .stdout(predicate::str::contains("State:     running"))
            .stdout(predicate::str::contains("Remaining: 50:00"));
    }

    #[test]
    fn test_json_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        session(&dir, &[], "mode short\njson\nquit\n")
            .success()
            .stdout(predicate::str::contains("\"mode\": \"short_rest\""))
            .stdout(predicate::str::contains("\"remainingSeconds\": 300"))
            .stdout(predicate::str::contains("\"status\": \"stopped\""));
    }

    #[test]
    fn test_ambient_toggle_notifications() {
        let dir = tempfile::tempdir().unwrap();
        session(&dir, &[], "ambient rain\nambient rain\nquit\n")
            .success()
            .stdout(predicate::str::contains("[Sound playing] Now playing rain sound"))
            .stdout(predicate::str::contains(
                "[Sound stopped] rain sound has been stopped",
            ));
    }

    #[test]
    fn test_unknown_command_keeps_session_alive() {
        let dir = tempfile::tempdir().unwrap();
        session(&dir, &[], "launch\nreset\nquit\n")
            .success()
            .stdout(predicate::str::contains("launch"))
            .stdout(predicate::str::contains("[Timer Reset] Timer has been reset"));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        session(&dir, &[], "pause\n").success();
    }

    #[test]
    fn test_preference_edits_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        session(&dir, &["--work", "10"], "sound chime\nduration long 20\nquit\n")
            .success()
            .stdout(predicate::str::contains("Alert sound set to Chime Sound"));

        let saved = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(saved.contains("\"chime\""));
        assert!(saved.contains("\"long_rest_minutes\": 20"));
        // Command-line overrides are not written back.
        assert!(saved.contains("\"work_minutes\": 25"));
    }
}
