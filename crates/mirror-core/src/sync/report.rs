//! Outcome of a synchronization pass

use crate::action::{ActionRecord, FileAction};

/// How a pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Every step ran and every path was reconciled
    Completed,
    /// Every step ran but some paths could not be reconciled
    CompletedWithErrors,
    /// The roots could not be prepared; nothing was scanned
    Aborted,
}

/// A path the pass could not reconcile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    /// Relative path below the replica (or source) root
    pub path: String,
    /// What was being attempted, e.g. "copy"
    pub operation: &'static str,
    /// Human-readable error
    pub message: String,
}

/// Report from one synchronization pass
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub status: SyncStatus,
    /// Mutations applied, in the order they happened
    pub actions: Vec<ActionRecord>,
    /// Paths that could not be reconciled
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub(crate) fn new() -> Self {
        Self {
            status: SyncStatus::Completed,
            actions: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub(crate) fn aborted() -> Self {
        Self {
            status: SyncStatus::Aborted,
            ..Self::new()
        }
    }

    pub(crate) fn push_failure(&mut self, failure: SyncFailure) {
        self.failures.push(failure);
        self.status = SyncStatus::CompletedWithErrors;
    }

    /// True if the pass left the replica untouched.
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }

    /// True if every step ran without a per-path failure.
    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Completed
    }

    /// Number of applied actions of the given kind.
    pub fn count(&self, kind: FileAction) -> usize {
        self.actions.iter().filter(|a| a.kind == kind).count()
    }
}
