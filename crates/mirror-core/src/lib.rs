//! Reconciliation engine for the directory mirror
//!
//! This crate turns a replica directory into an exact copy of a source
//! directory, one full pass at a time:
//!
//! - **Actions**: the `Added` / `Removed` / `Replaced` records every mutation
//!   produces
//! - **Logging capability**: the [`SyncLog`] trait and the timestamped
//!   [`FileLog`] behind it
//! - **Synchronizer**: scan, diff and mutate in a fixed order of steps
//!
//! # Architecture
//!
//! ```text
//!        mirror-cli (polling loop)
//!                  |
//!             mirror-core
//!                  |
//!              mirror-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use mirror_core::{FileLog, Synchronizer};
//!
//! let log = Arc::new(FileLog::new("/var/log/mirror"));
//! let synchronizer = Synchronizer::new(log);
//! let report = synchronizer.synchronize(Path::new("/data/source"), Path::new("/data/replica"))?;
//! println!("{} changes", report.actions.len());
//! # Ok::<(), mirror_core::Error>(())
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod log;
pub mod sync;

pub use action::{ActionRecord, FileAction, ReplaceReason};
pub use config::{MirrorConfig, SyncOptions};
pub use error::{Error, Result};
pub use log::{FileLog, LOG_FILE_NAME, LogEntry, RecordingLog, SyncLog};
pub use sync::{SyncFailure, SyncReport, SyncStatus, Synchronizer};
