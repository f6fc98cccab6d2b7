//! A flat cache directory capped at a byte budget.
//!
//! Entries are plain files directly inside the directory. There is no index:
//! sizes and modification times are read from the filesystem every time the
//! cache is pruned.
//!
//! # Eviction
//!
//! [`CacheDirectory::prune`] deletes entries oldest-first (by modification
//! time, then by name) until the bytes on disk plus the bytes requested fit
//! in the budget, or nothing is left to delete. A size guess passed to
//! [`CacheDirectory::open`] is only advisory; the real size of a new entry is
//! accounted for on the next prune.
//!
//! # Limitations
//!
//! No locking is done. Another process changing the directory between the
//! listing and the deletions can skew the accounting or make a deletion
//! fail; such a failure is returned to the caller and may leave the
//! directory over budget.

use std::cmp::Ordering;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{CfgsError, Result};

// ---------------------------------------------------------------------------
// CacheOpen
// ---------------------------------------------------------------------------

/// Result of [`CacheDirectory::open`].
#[derive(Debug)]
pub enum CacheOpen {
    /// The entry already existed and is open for reading.
    Hit(File),
    /// The entry did not exist; it has been created empty and is open for
    /// writing.
    Miss(File),
}

impl CacheOpen {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheOpen::Hit(_))
    }

    pub fn into_file(self) -> File {
        match self {
            CacheOpen::Hit(file) | CacheOpen::Miss(file) => file,
        }
    }
}

// ---------------------------------------------------------------------------
// CacheEntryInfo / PruneReport
// ---------------------------------------------------------------------------

/// Size and age of one cache entry, as last seen on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntryInfo {
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl CacheEntryInfo {
    /// Eviction order: oldest first, ties broken by name.
    fn eviction_cmp(&self, other: &Self) -> Ordering {
        self.modified
            .cmp(&other.modified)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// What a call to [`CacheDirectory::prune`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Bytes on disk before pruning.
    pub before_bytes: u64,
    /// Bytes on disk after pruning.
    pub after_bytes: u64,
    /// Entries deleted, in the order they were deleted.
    pub deleted: Vec<CacheEntryInfo>,
}

// ---------------------------------------------------------------------------
// CacheDirectory
// ---------------------------------------------------------------------------

/// A directory of cached files with an optional size budget.
#[derive(Debug, Clone)]
pub struct CacheDirectory {
    path: PathBuf,
    budget: u64,
}

impl CacheDirectory {
    /// Create the directory if needed and prune any existing overflow.
    ///
    /// A `budget` of `0` means unlimited.
    pub fn new(path: impl Into<PathBuf>, budget: u64) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        let cache = Self { path, budget };
        cache.prune(0)?;
        Ok(cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Open a cached entry.
    ///
    /// An existing entry is opened for reading and nothing is pruned. A
    /// missing entry triggers a prune that makes room for `size_guess`
    /// bytes, then is created (truncated) and opened for writing. A name
    /// taken by something other than a regular file fails with
    /// [`CfgsError::Io`] when it is opened for writing.
    pub fn open(&self, filename: &str, size_guess: u64) -> Result<CacheOpen> {
        check_entry_name(filename)?;

        let full = self.path.join(filename);
        if full.is_file() {
            log::debug!("cache hit: {}", full.display());
            return Ok(CacheOpen::Hit(File::open(&full)?));
        }

        log::debug!("cache miss: {} (size guess {size_guess})", full.display());
        self.prune(size_guess)?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full)?;
        Ok(CacheOpen::Miss(file))
    }

    /// Delete the oldest entries until `bytes_needed` more bytes fit in the
    /// budget, or until the directory is empty.
    ///
    /// Does nothing when the budget is unlimited.
    pub fn prune(&self, bytes_needed: u64) -> Result<PruneReport> {
        if self.budget == 0 {
            return Ok(PruneReport::default());
        }

        let entries = self.entries()?;
        let before_bytes: u64 = entries.iter().map(|entry| entry.size).sum();
        let mut report = PruneReport {
            before_bytes,
            after_bytes: before_bytes,
            deleted: Vec::new(),
        };

        let mut required = before_bytes.saturating_add(bytes_needed);
        if required <= self.budget {
            return Ok(report);
        }

        log::info!(
            "pruning {}: {before_bytes} bytes on disk, {bytes_needed} needed, budget {}",
            self.path.display(),
            self.budget
        );

        for entry in entries {
            std::fs::remove_file(self.path.join(&entry.name))?;
            log::debug!("evicted {} ({} bytes)", entry.name, entry.size);

            required = required.saturating_sub(entry.size);
            report.after_bytes -= entry.size;
            report.deleted.push(entry);
            if required <= self.budget {
                break;
            }
        }

        if required > self.budget {
            log::warn!(
                "{} cannot fit {bytes_needed} bytes within budget {} even when empty",
                self.path.display(),
                self.budget
            );
        }
        Ok(report)
    }

    /// Every entry currently on disk, in eviction order.
    ///
    /// Anything in the directory that is not a regular file is ignored.
    pub fn entries(&self) -> Result<Vec<CacheEntryInfo>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                log::debug!(
                    "ignoring non-file cache entry {}",
                    entry.path().display()
                );
                continue;
            }
            entries.push(CacheEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
                modified: meta.modified()?,
            });
        }
        entries.sort_by(CacheEntryInfo::eviction_cmp);
        Ok(entries)
    }

    /// Total bytes used by the entries on disk.
    pub fn total_size(&self) -> Result<u64> {
        Ok(self.entries()?.iter().map(|entry| entry.size).sum())
    }
}

/// Cache entries live directly in the cache directory.
fn check_entry_name(filename: &str) -> Result<()> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\']);
    if invalid {
        return Err(CfgsError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
