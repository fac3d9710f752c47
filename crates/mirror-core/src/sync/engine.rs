//! Synchronizer implementation
//!
//! A pass runs the same steps in the same order every time:
//!
//! 1. create both roots if they are missing
//! 2. snapshot both trees
//! 3. remove replica files the source no longer has
//! 4. prune replica directories the source no longer has, deepest first
//! 5. overwrite replica files whose size or digest differs
//! 6. create source directories missing from the replica, shallowest first
//! 7. copy source files missing from the replica
//!
//! Removal runs before creation so a path that changed from file to
//! directory (or back) is cleared before its replacement is written.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use mirror_fs::{FileSnapshot, RelativePath, content_equals, io, list_directories, scan};

use crate::action::{ActionRecord, FileAction, ReplaceReason};
use crate::config::SyncOptions;
use crate::log::SyncLog;
use crate::{Error, Result};

use super::report::{SyncFailure, SyncReport};

/// Mirrors a source tree onto a replica tree, one full pass per call.
///
/// Holds no state between passes; everything is rebuilt by re-scanning.
pub struct Synchronizer {
    log: Arc<dyn SyncLog>,
    options: SyncOptions,
}

impl Synchronizer {
    /// Create a synchronizer with default options (permanent deletion,
    /// per-path failure isolation).
    pub fn new(log: Arc<dyn SyncLog>) -> Self {
        Self::with_options(log, SyncOptions::default())
    }

    pub fn with_options(log: Arc<dyn SyncLog>, options: SyncOptions) -> Self {
        Self { log, options }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// The log every pass writes to.
    pub fn log(&self) -> &dyn SyncLog {
        self.log.as_ref()
    }

    /// Run one synchronization pass from `source` onto `replica`.
    ///
    /// If a root cannot be created the error is logged and an aborted report
    /// is returned. Failures on individual paths are logged and collected in
    /// the report unless `fail_fast` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if either tree cannot be enumerated, or on the first
    /// per-path failure when `fail_fast` is set.
    pub fn synchronize(&self, source: &Path, replica: &Path) -> Result<SyncReport> {
        self.log.log(&format!(
            "Try sync from {} to {}",
            source.display(),
            replica.display()
        ));

        if let Err(e) = prepare_roots(source, replica) {
            tracing::error!(error = %e, "failed to prepare sync roots");
            self.log
                .log(&format!("Error occurred while preparing directories: {e}"));
            return Ok(SyncReport::aborted());
        }

        let source_files = scan(source).map_err(|e| Error::Scan {
            root: source.to_path_buf(),
            source: e,
        })?;
        let replica_files = scan(replica).map_err(|e| Error::Scan {
            root: replica.to_path_buf(),
            source: e,
        })?;

        let mut pass = Pass {
            log: self.log.as_ref(),
            options: &self.options,
            source: &source_files,
            replica: &replica_files,
            report: SyncReport::new(),
        };

        pass.remove_obsolete_files()?;
        pass.remove_obsolete_directories()?;
        pass.replace_changed_files()?;
        pass.create_missing_directories()?;
        pass.copy_new_files()?;

        tracing::debug!(
            actions = pass.report.actions.len(),
            failures = pass.report.failures.len(),
            "pass finished"
        );
        Ok(pass.report)
    }
}

fn prepare_roots(source: &Path, replica: &Path) -> mirror_fs::Result<()> {
    fs::create_dir_all(source).map_err(|e| mirror_fs::Error::io(source, e))?;
    fs::create_dir_all(replica).map_err(|e| mirror_fs::Error::io(replica, e))?;
    Ok(())
}

fn is_empty_dir(path: &Path) -> mirror_fs::Result<bool> {
    let mut entries = fs::read_dir(path).map_err(|e| mirror_fs::Error::io(path, e))?;
    Ok(entries.next().is_none())
}

/// State of one pass: both snapshots plus what has been done so far.
struct Pass<'a> {
    log: &'a dyn SyncLog,
    options: &'a SyncOptions,
    source: &'a FileSnapshot,
    replica: &'a FileSnapshot,
    report: SyncReport,
}

impl Pass<'_> {
    fn apply(&mut self, kind: FileAction, message: String) {
        self.log.log_action(kind, &message);
        self.report.actions.push(ActionRecord::new(kind, message));
    }

    /// Log a failed path and keep going, or stop the pass under `fail_fast`.
    fn fail(
        &mut self,
        path: &RelativePath,
        operation: &'static str,
        error: mirror_fs::Error,
    ) -> Result<()> {
        tracing::warn!(%path, operation, error = %error, "path could not be reconciled");
        self.log
            .log(&format!("Failed to {operation} {path}: {error}"));

        if self.options.fail_fast {
            return Err(Error::PathFailed {
                path: path.to_string(),
                operation,
                source: error,
            });
        }

        self.report.push_failure(SyncFailure {
            path: path.to_string(),
            operation,
            message: error.to_string(),
        });
        Ok(())
    }

    fn remove_obsolete_files(&mut self) -> Result<()> {
        let (source, replica) = (self.source, self.replica);

        for (path, metadata) in replica.missing_from(source) {
            match self.options.deletion.delete_file(path, &metadata.path) {
                Ok(()) => self.apply(
                    FileAction::Removed,
                    format!(
                        "{path} was removed from replica at {}",
                        metadata.path.display()
                    ),
                ),
                Err(e) => self.fail(path, "remove", e)?,
            }
        }
        Ok(())
    }

    fn remove_obsolete_directories(&mut self) -> Result<()> {
        let (source, replica) = (self.source, self.replica);

        let mut directories = list_directories(replica.root()).map_err(|e| Error::Scan {
            root: replica.root().to_path_buf(),
            source: e,
        })?;
        // Deepest first so a parent emptied by its child's removal goes too
        directories.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tracing::debug!(count = directories.len(), "checking replica directories");

        for dir in directories {
            if dir.resolve(source.root()).is_dir() {
                continue;
            }
            let location = dir.resolve(replica.root());
            match is_empty_dir(&location) {
                Ok(false) => {}
                Ok(true) => match fs::remove_dir(&location) {
                    Ok(()) => self.apply(
                        FileAction::Removed,
                        format!(
                            "{dir} directory was removed from replica at {}",
                            location.display()
                        ),
                    ),
                    Err(e) => {
                        self.fail(&dir, "remove directory", mirror_fs::Error::io(&location, e))?
                    }
                },
                Err(e) => self.fail(&dir, "inspect directory", e)?,
            }
        }
        Ok(())
    }

    fn replace_changed_files(&mut self) -> Result<()> {
        let (source, replica) = (self.source, self.replica);

        for (path, original, copy) in source.common_with(replica) {
            let reason = if original.len != copy.len {
                ReplaceReason::SizeDiffers
            } else {
                match content_equals(&original.path, &copy.path) {
                    Ok(true) => continue,
                    Ok(false) => ReplaceReason::ContentDiffers,
                    Err(e) => {
                        self.fail(path, "compare", e)?;
                        continue;
                    }
                }
            };

            match io::copy_atomic(&original.path, &path.resolve(replica.root())) {
                Ok(_) => self.apply(
                    FileAction::Replaced,
                    format!(
                        "{path} in replica was replaced from source at {}: {reason}",
                        original.path.display()
                    ),
                ),
                Err(e) => self.fail(path, "copy", e)?,
            }
        }
        Ok(())
    }

    fn create_missing_directories(&mut self) -> Result<()> {
        let (source, replica) = (self.source, self.replica);

        let mut directories = list_directories(source.root()).map_err(|e| Error::Scan {
            root: source.root().to_path_buf(),
            source: e,
        })?;
        // Shallowest first so every parent exists before its children
        directories.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

        for dir in directories {
            let location = dir.resolve(replica.root());
            if location.is_dir() {
                continue;
            }
            match fs::create_dir_all(&location) {
                Ok(()) => self.apply(
                    FileAction::Added,
                    format!("{dir} directory was added from source"),
                ),
                Err(e) => {
                    self.fail(&dir, "create directory", mirror_fs::Error::io(&location, e))?
                }
            }
        }
        Ok(())
    }

    fn copy_new_files(&mut self) -> Result<()> {
        let (source, replica) = (self.source, self.replica);

        for (path, metadata) in source.missing_from(replica) {
            match io::copy_atomic(&metadata.path, &path.resolve(replica.root())) {
                Ok(_) => self.apply(FileAction::Added, format!("{path} was added from source")),
                Err(e) => self.fail(path, "copy", e)?,
            }
        }
        Ok(())
    }
}
