//! The polling loop
//!
//! Runs one synchronization pass, logs how it ended, sleeps for the interval
//! and starts over. A failed pass never stops the loop.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use colored::Colorize;
use mirror_core::{FileLog, MirrorConfig, SyncOptions, SyncReport, SyncStatus, Synchronizer};
use mirror_fs::{ConfigStore, DeletionStrategy, absolute};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Merge the optional config file with command-line flags.
///
/// Flags win over the file.
pub fn resolve_options(cli: &Cli) -> Result<SyncOptions> {
    let config = match &cli.config {
        Some(path) => ConfigStore::new().load::<MirrorConfig>(path)?,
        None => MirrorConfig::default(),
    };
    let options = config.into_options(cli.trash.clone(), cli.fail_fast);

    // Trashed files inside the replica would be trashed again every pass
    if let DeletionStrategy::Trash { dir } = &options.deletion
        && absolute(dir)?.starts_with(absolute(&cli.replica)?)
    {
        return Err(CliError::user(format!(
            "Trash directory {} must not be inside the replica {}",
            dir.display(),
            cli.replica.display()
        )));
    }

    Ok(options)
}

/// Run passes forever, or once with `--once`.
pub fn run_mirror(cli: &Cli, options: SyncOptions) -> Result<()> {
    let log = Arc::new(FileLog::new(&cli.log_dir));
    let synchronizer = Synchronizer::with_options(log, options);
    let interval = Duration::from_secs(cli.interval);
    tracing::debug!(options = ?synchronizer.options(), "synchronizer ready");

    if let DeletionStrategy::Trash { dir } = &synchronizer.options().deletion {
        println!(
            "{} Removed files are moved to {}",
            "=>".blue().bold(),
            dir.display()
        );
    }

    if !cli.once {
        println!(
            "{} Mirroring {} to {} every {}s (log: {})",
            "=>".blue().bold(),
            cli.source.display().to_string().cyan(),
            cli.replica.display().to_string().cyan(),
            cli.interval,
            cli.log_dir.display()
        );
    }

    loop {
        let outcome = run_pass(&synchronizer, &cli.source, &cli.replica);

        if cli.once {
            return match outcome? {
                report if report.is_success() => Ok(()),
                report if report.status == SyncStatus::Aborted => {
                    Err(CliError::user("Synchronization pass was aborted"))
                }
                report => Err(CliError::user(format!(
                    "Synchronization pass finished with {} failures",
                    report.failures.len()
                ))),
            };
        }

        if let Err(e) = outcome {
            tracing::debug!(error = %e, "pass failed; retrying after the interval");
        }
        thread::sleep(interval);
    }
}

/// Run one pass and log how it ended.
fn run_pass(synchronizer: &Synchronizer, source: &Path, replica: &Path) -> Result<SyncReport> {
    let log = synchronizer.log();

    match synchronizer.synchronize(source, replica) {
        Ok(report) => {
            match report.status {
                SyncStatus::Completed => log.log("Synchronized"),
                SyncStatus::CompletedWithErrors => log.log(&format!(
                    "Synchronized with {} failures",
                    report.failures.len()
                )),
                SyncStatus::Aborted => {}
            }
            Ok(report)
        }
        Err(e) => {
            log.log(&format!("Synchronization failed: {e}"));
            Err(e.into())
        }
    }
}
