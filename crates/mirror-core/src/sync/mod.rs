//! Synchronization of a replica tree from a source tree
//!
//! - [`Synchronizer`]: runs one full pass
//! - [`SyncReport`]: what a pass changed and what failed

mod engine;
mod report;

pub use engine::Synchronizer;
pub use report::{SyncFailure, SyncReport, SyncStatus};
