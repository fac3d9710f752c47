//! [`TestTree`] builder for mirror test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::TempDir;

/// A temporary directory tree with helpers for setup and assertion.
///
/// All paths taken by the helpers are relative to the tree root. Listings
/// render them with forward slashes; [`TestTree::file_paths`] keeps the raw
/// names for trees holding names that are not valid UTF-8.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write("dir/a.txt", "AAAAA");
/// tree.assert_file("dir/a.txt", "AAAAA");
/// assert_eq!(tree.files(), vec!["dir/a.txt".to_string()]);
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the tree.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: impl AsRef<Path>, content: impl AsRef<[u8]>) -> &Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    /// Create a directory and all its parents.
    pub fn mkdir(&self, relative: &str) -> &Self {
        fs::create_dir_all(self.path(relative)).unwrap();
        self
    }

    /// Read a file's content as a string.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    /// All regular files below the root, as sorted relative paths.
    pub fn files(&self) -> Vec<String> {
        self.file_paths().iter().map(|p| render(p)).collect()
    }

    /// All regular files below the root with their raw names, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        collect(self.root(), self.root(), &mut found, false);
        found.sort();
        found
    }

    /// All directories below the root, as sorted relative paths.
    pub fn dirs(&self) -> Vec<String> {
        let mut found = Vec::new();
        collect(self.root(), self.root(), &mut found, true);
        found.sort();
        found.iter().map(|p| render(p)).collect()
    }

    /// SHA-256 of every file, keyed by raw relative path, sorted.
    pub fn digests(&self) -> Vec<(PathBuf, String)> {
        self.file_paths()
            .into_iter()
            .map(|rel| {
                let bytes = fs::read(self.path(&rel)).unwrap();
                let digest = format!("{:x}", Sha256::digest(&bytes));
                (rel, digest)
            })
            .collect()
    }

    /// Assert a file exists with the given content.
    pub fn assert_file(&self, relative: &str, expected: &str) {
        let path = self.path(relative);
        assert!(path.is_file(), "Expected file {} to exist", relative);
        assert_eq!(self.read(relative), expected, "Content mismatch for {}", relative);
    }

    /// Assert nothing exists at `relative`.
    pub fn assert_missing(&self, relative: &str) {
        assert!(
            !self.path(relative).exists(),
            "Expected {} to be absent",
            relative
        );
    }

    /// Assert a directory exists at `relative`.
    pub fn assert_dir(&self, relative: &str) {
        assert!(
            self.path(relative).is_dir(),
            "Expected directory {} to exist",
            relative
        );
    }
}

fn collect(root: &Path, dir: &Path, found: &mut Vec<PathBuf>, want_dirs: bool) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let file_type = entry.file_type().unwrap();
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap().to_path_buf();
        if file_type.is_dir() {
            if want_dirs {
                found.push(relative);
            }
            collect(root, &path, found, want_dirs);
        } else if file_type.is_file() && !want_dirs {
            found.push(relative);
        }
    }
}

/// Components joined with `/`, lossy for names that are not UTF-8.
fn render(relative: &Path) -> String {
    relative
        .iter()
        .map(|component| component.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A source tree and a replica tree side by side.
#[derive(Default)]
pub struct MirrorFixture {
    pub source: TestTree,
    pub replica: TestTree,
}

impl MirrorFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert the replica holds exactly the source's files, contents and
    /// directories.
    pub fn assert_converged(&self) {
        assert_eq!(self.replica.digests(), self.source.digests(), "file sets differ");
        assert_eq!(self.replica.dirs(), self.source.dirs(), "directory sets differ");
    }
}
