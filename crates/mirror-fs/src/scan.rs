//! Directory tree scanning
//!
//! Walks a root recursively and captures every regular file below it, keyed
//! by its path relative to the root. Symbolic links are neither followed nor
//! recorded.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::{Error, RelativePath, Result};

/// Metadata captured for one file at scan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Absolute location of the file
    pub path: PathBuf,
    /// File size in bytes
    pub len: u64,
}

/// All files found below one root, keyed by relative path.
///
/// Iteration is ordered by relative path, which keeps log output stable
/// between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSnapshot {
    root: PathBuf,
    files: BTreeMap<RelativePath, FileMetadata>,
}

impl FileSnapshot {
    /// Create an empty snapshot for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: BTreeMap::new(),
        }
    }

    /// The absolute root the snapshot was taken from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn insert(&mut self, path: RelativePath, metadata: FileMetadata) {
        self.files.insert(path, metadata);
    }

    pub fn get(&self, path: &RelativePath) -> Option<&FileMetadata> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &RelativePath) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, RelativePath, FileMetadata> {
        self.files.iter()
    }

    /// Relative paths present here but absent from `other`.
    pub fn missing_from<'a>(
        &'a self,
        other: &'a FileSnapshot,
    ) -> impl Iterator<Item = (&'a RelativePath, &'a FileMetadata)> + 'a {
        self.files.iter().filter(|(path, _)| !other.contains(path))
    }

    /// Entries present in both snapshots, paired as `(self, other)`.
    pub fn common_with<'a>(
        &'a self,
        other: &'a FileSnapshot,
    ) -> impl Iterator<Item = (&'a RelativePath, &'a FileMetadata, &'a FileMetadata)> + 'a {
        self.files
            .iter()
            .filter_map(|(path, mine)| other.get(path).map(|theirs| (path, mine, theirs)))
    }
}

impl<'a> IntoIterator for &'a FileSnapshot {
    type Item = (&'a RelativePath, &'a FileMetadata);
    type IntoIter = btree_map::Iter<'a, RelativePath, FileMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Scan `root` recursively and record every regular file below it.
///
/// An empty tree produces an empty snapshot.
///
/// # Errors
///
/// Returns an error if the root or any directory below it cannot be
/// enumerated, or a file's metadata cannot be read.
pub fn scan(root: &Path) -> Result<FileSnapshot> {
    let root = dunce::canonicalize(root).map_err(|e| Error::io(root, e))?;
    let mut snapshot = FileSnapshot::new(&root);

    for entry in walk(&root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let metadata = entry
            .metadata()
            .map_err(|e| walk_error(entry.path(), e))?;
        let relative = RelativePath::from_root(&root, entry.path())?;
        snapshot.insert(
            relative,
            FileMetadata {
                path: entry.path().to_path_buf(),
                len: metadata.len(),
            },
        );
    }

    tracing::info!("Found {} files in {}", snapshot.len(), root.display());
    Ok(snapshot)
}

/// List every directory below `root` (the root itself excluded).
///
/// # Errors
///
/// Returns an error if the root or any directory below it cannot be
/// enumerated.
pub fn list_directories(root: &Path) -> Result<Vec<RelativePath>> {
    let root = dunce::canonicalize(root).map_err(|e| Error::io(root, e))?;
    let mut directories = Vec::new();

    for entry in walk(&root) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            directories.push(RelativePath::from_root(&root, entry.path())?);
        }
    }

    Ok(directories)
}

fn walk(root: &Path) -> impl Iterator<Item = Result<DirEntry>> {
    let root_path = root.to_path_buf();
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .map(move |entry| {
            entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root_path.clone());
                walk_error(&path, e)
            })
        })
}

fn walk_error(path: &Path, error: walkdir::Error) -> Error {
    Error::io(path, std::io::Error::from(error))
}
