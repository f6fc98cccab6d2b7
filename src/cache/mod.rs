//! Size-bounded cache directories.
//!
//! [`Cache`] is an application's cache root (`$XDG_CACHE_HOME/<app>`); each
//! [`CacheDirectory`] under it is a flat directory of entries with its own
//! byte budget.
//!
//! ```rust,no_run
//! use std::io::Write;
//! use xdg_appfiles::{App, cache::CacheOpen};
//!
//! let app = App::new("my-app").unwrap();
//! let thumbs = app.cache.directory("thumbs", 10 * 1024 * 1024).unwrap();
//! match thumbs.open("cat.png", 4096).unwrap() {
//!     CacheOpen::Hit(_file) => { /* read it */ }
//!     CacheOpen::Miss(mut file) => file.write_all(b"...").unwrap(),
//! }
//! ```

pub mod directory;

pub use directory::{CacheDirectory, CacheEntryInfo, CacheOpen, PruneReport};

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Directory name used by [`Cache::default_directory`] unless configured.
pub const DEFAULT_CACHE_DIR_NAME: &str = "cache";

/// Root of an application's cache directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    root: PathBuf,
    default_name: String,
}

impl Cache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_default_name(root, DEFAULT_CACHE_DIR_NAME)
    }

    pub fn with_default_name(root: impl Into<PathBuf>, default_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_name: default_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open (creating if needed) the cache directory `root/name`.
    ///
    /// `budget` is in bytes; `0` means unlimited.
    pub fn directory(&self, name: &str, budget: u64) -> Result<CacheDirectory> {
        CacheDirectory::new(self.root.join(name), budget)
    }

    /// The cache directory with the configured default name.
    pub fn default_directory(&self, budget: u64) -> Result<CacheDirectory> {
        self.directory(&self.default_name, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_directory_lives_under_root() {
        let tmp = tempdir().expect("temp dir");
        let cache = Cache::new(tmp.path().join("test"));

        let dir = cache.default_directory(0).expect("directory");
        assert_eq!(dir.path(), tmp.path().join("test/cache"));
        assert!(dir.path().is_dir());
        assert_eq!(dir.budget(), 0);
    }

    #[test]
    fn named_directories_are_independent() {
        let tmp = tempdir().expect("temp dir");
        let cache = Cache::with_default_name(tmp.path(), "blobs");

        let a = cache.directory("a", 5).unwrap();
        let b = cache.default_directory(5).unwrap();
        assert_ne!(a.path(), b.path());
        assert!(b.path().ends_with("blobs"));
    }
}
