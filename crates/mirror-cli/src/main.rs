//! Mirror CLI
//!
//! Keeps a replica directory identical to a source directory by running a
//! synchronization pass on a fixed interval.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    tracing::debug!(?cli, "parsed arguments");

    let options = commands::resolve_options(&cli)?;
    commands::run_mirror(&cli, options)
}

/// Install the diagnostics subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug output with
/// `--verbose`. Diagnostics go to stderr so they never mix with the action
/// log echoed on stdout.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact();

    // A subscriber may already be installed (tests); keep the existing one
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}
