//! Focus Timer CLI - an interactive terminal countdown timer
//!
//! Three modes, each with its own countdown:
//! - Work (25 minutes by default)
//! - Short Rest (5 minutes)
//! - Long Rest (15 minutes)
//!
//! Switching modes keeps each mode's remaining time. When a countdown reaches
//! zero the alert sound loops until acknowledged.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use focus_timer::cli::{prepare_settings, Cli, Commands, Display, RunArgs, Session};
use focus_timer::sound::{open_backend, AudioContext, SoundLibrary, DEFAULT_ASSET_ROOT};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so the session output on stdout stays readable.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => run_session(args).await?,
        Some(Commands::Sounds { assets }) => {
            let library = SoundLibrary::new(assets.unwrap_or_else(|| DEFAULT_ASSET_ROOT.into()));
            Display::show_sounds(&library);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => run_session(RunArgs::default()).await?,
    }

    Ok(())
}

/// Runs an interactive session.
async fn run_session(args: RunArgs) -> Result<()> {
    let (settings, file) = prepare_settings(&args)?;

    // The device must outlive every output created on its backend.
    let (_device, backend) = open_backend(args.no_sound);
    let library = SoundLibrary::new(
        args.assets
            .clone()
            .unwrap_or_else(|| DEFAULT_ASSET_ROOT.into()),
    );
    tracing::debug!("Using {} audio backend", backend.name());

    let session = Session::new(settings, AudioContext::new(backend, library), file);
    session.run().await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
