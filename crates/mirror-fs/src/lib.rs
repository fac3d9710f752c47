//! Filesystem layer for the directory mirror
//!
//! Provides relative path handling, tree scanning, content digests,
//! atomic file copies and configurable deletion.

pub mod checksum;
pub mod config;
pub mod delete;
pub mod error;
pub mod io;
pub mod path;
pub mod scan;

pub use checksum::{compute_file_checksum, content_equals};
pub use config::ConfigStore;
pub use delete::DeletionStrategy;
pub use error::{Error, Result};
pub use path::{RelativePath, absolute};
pub use scan::{FileMetadata, FileSnapshot, list_directories, scan};
