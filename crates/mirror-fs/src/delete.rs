//! Deletion strategies for obsolete replica files
//!
//! Files that no longer exist in the source are either removed for good or
//! moved into a trash directory where they can still be recovered.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, RelativePath, Result, io};

/// How obsolete replica files are disposed of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DeletionStrategy {
    /// Remove the file permanently
    #[default]
    Permanent,
    /// Move the file below `dir`, keeping its relative path
    Trash { dir: PathBuf },
}

impl DeletionStrategy {
    /// Dispose of the replica file at `location`, known as `relative` below
    /// the replica root.
    pub fn delete_file(&self, relative: &RelativePath, location: &Path) -> Result<()> {
        match self {
            Self::Permanent => fs::remove_file(location).map_err(|e| Error::io(location, e)),
            Self::Trash { dir } => move_to_trash(dir, relative, location),
        }
    }
}

fn move_to_trash(trash_dir: &Path, relative: &RelativePath, location: &Path) -> Result<()> {
    let target = free_trash_slot(&relative.resolve(trash_dir));
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    match fs::rename(location, &target) {
        Ok(()) => Ok(()),
        // Rename fails across filesystems; fall back to copy and remove
        Err(_) => {
            io::copy_atomic(location, &target)?;
            fs::remove_file(location).map_err(|e| Error::io(location, e))
        }
    }
}

/// First of `path`, `path.~1~`, `path.~2~`, ... that does not exist yet, so an
/// earlier trashed version is never overwritten.
fn free_trash_slot(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let mut generation = 1u32;
    loop {
        let mut name = path.as_os_str().to_os_string();
        name.push(format!(".~{generation}~"));
        let candidate = PathBuf::from(name);
        if !candidate.exists() {
            return candidate;
        }
        generation += 1;
    }
}
