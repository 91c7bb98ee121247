//! jwt-workbench: an offline JWT decoder and editor.
//!
//! Entry point for the application. Parses CLI arguments, installs the
//! log subscriber and delegates to the appropriate command handler.

#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use jwt_workbench::cli::{Cli, Commands};
use jwt_workbench::commands;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Parse CLI arguments and dispatch to the appropriate command handler.
///
/// Returns `ExitCode` so the caller can exit without `process::exit`,
/// allowing all destructors (including `Zeroizing`) to run.
fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = cli.config();
    tracing::debug!(?config, "configuration resolved");

    match &cli.command {
        Commands::Decode(args) => commands::decode::execute(args, &config)?,
        Commands::Edit(args) => commands::edit::execute(args, &config)?,
        Commands::Import => commands::import::execute(&config)?,
        Commands::Session(command) => commands::session::execute(command, &config)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Log to stderr, filtered by `level` (falling back to `warn`).
fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
