//! SHA-256 content digests
//!
//! Provides a single canonical checksum format (`sha256:<hex>`) used to decide
//! whether two files of equal length hold the same bytes.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Read buffer used while hashing
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the SHA-256 checksum of a file's contents.
///
/// The file is streamed in fixed-size chunks so large files are never held in
/// memory.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buffer).map_err(|e| Error::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Check whether two files hold identical bytes by comparing their digests.
///
/// Callers compare lengths first; this is only meaningful for files of equal
/// length.
///
/// # Errors
///
/// Returns an error if either file cannot be opened or read.
pub fn content_equals(a: &Path, b: &Path) -> Result<bool> {
    let left = compute_file_checksum(a)?;
    let right = compute_file_checksum(b)?;
    Ok(left == right)
}
