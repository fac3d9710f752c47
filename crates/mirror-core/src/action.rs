//! Mutation records emitted by a synchronization pass

/// The kind of change applied to the replica
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileAction {
    Added,
    Removed,
    Replaced,
}

impl FileAction {
    /// Log line prefix for this action.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Added => "[ADD]",
            Self::Removed => "[REMOVE]",
            Self::Replaced => "[REPLACE]",
        }
    }
}

impl std::fmt::Display for FileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Why an existing replica file was overwritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceReason {
    /// Byte lengths differ; no digest was computed
    SizeDiffers,
    /// Same length, different digest
    ContentDiffers,
}

impl std::fmt::Display for ReplaceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SizeDiffers => f.write_str("size differs"),
            Self::ContentDiffers => f.write_str("content differs"),
        }
    }
}

/// One applied mutation: what happened and a human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub kind: FileAction,
    pub message: String,
}

impl ActionRecord {
    pub fn new(kind: FileAction, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
