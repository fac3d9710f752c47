//! Root-relative path handling for snapshot keys

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// A path relative to a scanned root.
///
/// Snapshots of the source and replica trees are keyed by this type, so the
/// same file is found under both roots. The key holds the real name bytes of
/// every component: names that are not valid UTF-8 and names containing
/// characters that are separators on other platforms resolve back to exactly
/// the entry that was scanned. Only [`Display`](std::fmt::Display) is lossy.
///
/// Ordering is component-wise and byte-wise, which matches a case-sensitive
/// host filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath {
    /// Normal components only: no root, prefix, `.` or empty segments
    inner: PathBuf,
}

impl RelativePath {
    /// Create a RelativePath from any path-like input.
    ///
    /// Splits on the platform's separators and drops empty and `.`
    /// components. A backslash is a separator on Windows only.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let inner = path
            .as_ref()
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();
        Self { inner }
    }

    /// Compute the path of `path` relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutsideRoot`] if `path` does not start with `root`.
    pub fn from_root(root: &Path, path: &Path) -> Result<Self> {
        let relative = path.strip_prefix(root).map_err(|_| Error::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;
        Ok(Self::new(relative))
    }

    /// The relative path as a platform-native path.
    pub fn as_path(&self) -> &Path {
        &self.inner
    }

    /// Length of the native representation in bytes.
    ///
    /// A directory is always shorter than anything below it, which is what
    /// the pruning and creation passes order by.
    pub fn len(&self) -> usize {
        self.inner.as_os_str().len()
    }

    /// True for the root itself.
    pub fn is_empty(&self) -> bool {
        self.inner.as_os_str().is_empty()
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.inner.components().count()
    }

    /// Resolve this path against a root directory.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        if self.is_empty() {
            root.to_path_buf()
        } else {
            root.join(&self.inner)
        }
    }

    /// Get the parent path, `None` for top-level entries.
    pub fn parent(&self) -> Option<Self> {
        if self.depth() < 2 {
            return None;
        }
        self.inner.parent().map(|parent| Self {
            inner: parent.to_path_buf(),
        })
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&OsStr> {
        self.inner.file_name()
    }
}

/// Absolute form of `path` that can be compared with other paths.
///
/// `.` and `..` are folded lexically, then the longest existing ancestor is
/// canonicalized so symlinked prefixes compare equal. The path itself need
/// not exist.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read, or `path` is
/// empty.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = std::path::absolute(path).map_err(|e| Error::io(path, e))?;

    let mut lexical = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = dunce::canonicalize(existing) {
            return Ok(missing.iter().rev().fold(canonical, |acc, name| acc.join(name)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(lexical),
        }
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.inner
    }
}

/// Components joined with `/`, invalid UTF-8 replaced. For messages only.
impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, component) in self.inner.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", component.to_string_lossy())?;
        }
        Ok(())
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Path> for RelativePath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
