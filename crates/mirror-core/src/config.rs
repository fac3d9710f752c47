//! Configuration for synchronization passes

use std::path::PathBuf;

use mirror_fs::DeletionStrategy;
use serde::Deserialize;

/// Options consumed by the synchronizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// How obsolete replica files are disposed of
    pub deletion: DeletionStrategy,
    /// Abort the pass on the first per-path failure instead of logging it and
    /// moving on to the next path
    pub fail_fast: bool,
}

impl SyncOptions {
    pub fn with_deletion(mut self, deletion: DeletionStrategy) -> Self {
        self.deletion = deletion;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// On-disk configuration file (`.toml` or `.json`).
///
/// ```toml
/// fail_fast = false
///
/// [deletion]
/// mode = "trash"
/// dir = "/var/tmp/mirror-trash"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfig {
    pub deletion: DeletionStrategy,
    pub fail_fast: bool,
}

impl MirrorConfig {
    /// Apply command-line overrides on top of the file values.
    pub fn into_options(self, trash_dir: Option<PathBuf>, fail_fast: bool) -> SyncOptions {
        let deletion = match trash_dir {
            Some(dir) => DeletionStrategy::Trash { dir },
            None => self.deletion,
        };
        SyncOptions {
            deletion,
            fail_fast: fail_fast || self.fail_fast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_trash_dir_overrides_file() {
        let config = MirrorConfig::default();
        let options = config.into_options(Some(PathBuf::from("/trash")), false);
        assert_eq!(
            options.deletion,
            DeletionStrategy::Trash {
                dir: PathBuf::from("/trash")
            }
        );
        assert!(!options.fail_fast);
    }

    #[test]
    fn file_values_apply_without_overrides() {
        let config = MirrorConfig {
            deletion: DeletionStrategy::Trash {
                dir: PathBuf::from("/t"),
            },
            fail_fast: true,
        };
        let options = config.clone().into_options(None, false);
        assert_eq!(options.deletion, config.deletion);
        assert!(options.fail_fast);
    }
}
