//! xattr-rename - Parallel Extended Attribute Renamer
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use xattr_rename::config::{CliArgs, RenameConfig};
use xattr_rename::store::SystemStore;
use xattr_rename::walker::RenameCoordinator;

/// Exit code after Ctrl-C (128 + SIGINT)
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run completed without interruption
fn run() -> Result<bool> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.log_debug)?;

    // Validate and create config
    let config = RenameConfig::from_args(args).context("Invalid configuration")?;

    if !SystemStore::is_supported() {
        warn!("Extended attributes are not supported on this platform; every non-empty file will fail");
    }

    let coordinator = RenameCoordinator::new(config, Arc::new(SystemStore::new()));

    // Setup signal handler for graceful shutdown
    let shutdown_flag = coordinator.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let summary = coordinator.run().context("Rename failed")?;

    info!(
        files = summary.jobs,
        renamed = summary.renamed,
        skipped = summary.skipped,
        failed = summary.failed,
        inspected = summary.inspected,
        roots_skipped = summary.roots_skipped,
        dirs_skipped = summary.dirs_skipped,
        walk_errors = summary.walk_errors,
        duration_ms = summary.duration.as_millis() as u64,
        "Rename finished"
    );

    if !summary.completed {
        info!("Run was interrupted before completion");
    }

    Ok(summary.completed)
}

fn setup_logging(debug: bool) -> Result<()> {
    let default = if debug {
        "xattr_rename=debug,warn"
    } else {
        "xattr_rename=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the progress stream and debug lines
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
