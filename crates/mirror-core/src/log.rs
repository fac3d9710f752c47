//! The mirror's action log
//!
//! Every mutation a pass applies, and every error it meets, is written as one
//! timestamped line. The synchronizer only sees the narrow [`SyncLog`] trait,
//! so tests can substitute a [`RecordingLog`].

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};

use crate::action::FileAction;

/// Name of the log file created inside the log directory
pub const LOG_FILE_NAME: &str = "log.txt";

/// Timestamp layout at the start of each line
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink for the lines a synchronization pass produces.
///
/// Implementations never fail back into the caller.
pub trait SyncLog: Send + Sync {
    /// Record a plain message.
    fn log(&self, message: &str);

    /// Record a mutation of the replica.
    fn log_action(&self, action: FileAction, message: &str);
}

/// Render one log line: `<timestamp> <prefix> <message>`, or
/// `<timestamp> <message>` for plain messages.
pub fn format_entry(
    timestamp: &DateTime<Local>,
    action: Option<FileAction>,
    message: &str,
) -> String {
    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    match action {
        Some(action) => format!("{} {} {}", stamp, action.prefix(), message),
        None => format!("{} {}", stamp, message),
    }
}

/// Append-only text log that echoes every line to stdout.
#[derive(Debug, Clone)]
pub struct FileLog {
    dir: PathBuf,
}

impl FileLog {
    /// Create a log writing to `<dir>/log.txt`.
    ///
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of the log file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }

    fn write_line(&self, line: &str) {
        println!("{line}");
        if let Err(e) = append_line(&self.dir, line) {
            tracing::warn!(
                log = %self.path().display(),
                error = %e,
                "failed to write log entry"
            );
        }
    }
}

fn append_line(dir: &Path, line: &str) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))?;
    writeln!(file, "{line}")
}

impl SyncLog for FileLog {
    fn log(&self, message: &str) {
        self.write_line(&format_entry(&Local::now(), None, message));
    }

    fn log_action(&self, action: FileAction, message: &str) {
        self.write_line(&format_entry(&Local::now(), Some(action), message));
    }
}

/// A line captured by [`RecordingLog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub action: Option<FileAction>,
    pub message: String,
}

/// In-memory log that keeps every entry for later inspection.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries recorded so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the entries that record a mutation.
    pub fn actions(&self) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.action.is_some())
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, action: Option<FileAction>, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                action,
                message: message.to_string(),
            });
    }
}

impl SyncLog for RecordingLog {
    fn log(&self, message: &str) {
        self.push(None, message);
    }

    fn log_action(&self, action: FileAction, message: &str) {
        self.push(Some(action), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn action_entry_has_prefix() {
        let line = format_entry(&fixed_time(), Some(FileAction::Added), "a.txt was added from source");
        insta::assert_snapshot!(line, @"2024-03-09 07:05:01 [ADD] a.txt was added from source");
    }

    #[test]
    fn plain_entry_has_no_prefix() {
        let line = format_entry(&fixed_time(), None, "Synchronized");
        insta::assert_snapshot!(line, @"2024-03-09 07:05:01 Synchronized");
    }

    #[test]
    fn file_log_creates_directory_and_appends() {
        let temp = tempfile::tempdir().unwrap();
        let log = FileLog::new(temp.path().join("logs").join("nested"));

        log.log("first");
        log.log_action(FileAction::Removed, "b.txt was removed");

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" first"));
        assert!(lines[1].ends_with(" [REMOVE] b.txt was removed"));
    }

    #[test]
    fn file_log_survives_unwritable_location() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        // The log directory path runs through a file, so every write fails
        let log = FileLog::new(blocker.join("logs"));
        log.log("dropped");

        assert!(!log.path().exists());
    }

    #[test]
    fn recording_log_keeps_order() {
        let log = RecordingLog::new();
        log.log("start");
        log.log_action(FileAction::Added, "x");

        assert_eq!(
            log.entries(),
            vec![
                LogEntry { action: None, message: "start".into() },
                LogEntry { action: Some(FileAction::Added), message: "x".into() },
            ]
        );
        assert_eq!(log.actions().len(), 1);
        log.clear();
        assert!(log.entries().is_empty());
    }
}
