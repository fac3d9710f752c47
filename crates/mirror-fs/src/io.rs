//! Atomic file copies

use std::fs::{self, File};
use std::path::Path;

use crate::{Error, Result};

/// Prefix and suffix of the staging file a copy is written to before it is
/// renamed into place. Six random characters go in between.
const STAGING_PREFIX: &str = ".mirror-";
const STAGING_SUFFIX: &str = ".tmp";

/// Copy `source` to `destination`, replacing any existing file.
///
/// Uses copy-to-temp-then-rename so the destination is either the previous
/// file or the complete new one, never a truncated copy. Missing parent
/// directories of the destination are created. Returns the number of bytes
/// copied.
///
/// The staging name does not depend on the destination name, so any name
/// the filesystem accepts can be copied.
pub fn copy_atomic(source: &Path, destination: &Path) -> Result<u64> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let mut reader = File::open(source).map_err(|e| Error::io(source, e))?;
    let permissions = reader
        .metadata()
        .map_err(|e| Error::io(source, e))?
        .permissions();

    // Same directory keeps the rename on one filesystem; dropped on error
    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?;

    let copied =
        std::io::copy(&mut reader, staged.as_file_mut()).map_err(|e| Error::io(source, e))?;
    staged
        .as_file()
        .set_permissions(permissions)
        .map_err(|e| Error::io(staged.path(), e))?;
    // Flush to disk before the rename publishes the file
    staged
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(staged.path(), e))?;

    staged
        .persist(destination)
        .map_err(|e| Error::io(destination, e.error))?;

    tracing::trace!(
        source = %source.display(),
        destination = %destination.display(),
        bytes = copied,
        "copied file"
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_copy_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = copy_atomic(&dir.path().join("absent"), &dir.path().join("out.txt"));
        assert!(result.is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
