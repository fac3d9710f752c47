//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a synchronization pass early
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A root could not be enumerated, so there is nothing to diff
    #[error("Failed to scan {root}: {source}")]
    Scan {
        root: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// A single path failed while the pass was configured to stop on the
    /// first failure
    #[error("Failed to {operation} {path}: {source}")]
    PathFailed {
        path: String,
        operation: &'static str,
        #[source]
        source: mirror_fs::Error,
    },
}
