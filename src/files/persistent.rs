//! A single formatted file held in memory.
//!
//! [`PersistentFile`] loads its contents when opened, is edited in memory,
//! and only touches the disk again on [`PersistentFile::write`].
//! [`FileGuard`] adds the scoped form: the file is written when the guard
//! goes out of scope, whether that happens normally or while unwinding.
//!
//! Writes truncate and rewrite the file in place. They are not atomic: a
//! crash in the middle of a write can leave a truncated file behind.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Result;
use crate::format::{Contents, Format, FormatOptions, FormatSpec};

// ---------------------------------------------------------------------------
// PersistentFile
// ---------------------------------------------------------------------------

/// A config or data file with its parsed contents.
#[derive(Debug, Clone)]
pub struct PersistentFile {
    path: PathBuf,
    spec: &'static FormatSpec,
    options: FormatOptions,
    contents: Contents,
}

impl PersistentFile {
    /// Open `path` in the given format, creating its parent directories.
    ///
    /// A missing file is not an error: the contents start out as the
    /// format's empty value and the file is created on the first write.
    pub fn open(
        path: impl Into<PathBuf>,
        spec: &'static FormatSpec,
        options: FormatOptions,
    ) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = Self {
            path,
            spec,
            options,
            contents: spec.create_empty(),
        };
        file.read()?;
        Ok(file)
    }

    /// Replace the in-memory contents with what is on disk.
    pub fn read(&mut self) -> Result<&Contents> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                self.contents = self.spec.parse(&text).map_err(|err| {
                    log::warn!("failed to parse {}: {err}", self.path.display());
                    err
                })?;
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} does not exist yet, starting empty", self.path.display());
                self.contents = self.spec.create_empty();
            }
            Err(err) => return Err(err.into()),
        }
        Ok(&self.contents)
    }

    /// Serialize the contents and overwrite the file with them.
    pub fn write(&self) -> Result<()> {
        let text = self.spec.serialize(&self.contents, &self.options)?;
        std::fs::write(&self.path, text)?;
        log::debug!("wrote {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.spec.format
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    pub fn contents_mut(&mut self) -> &mut Contents {
        &mut self.contents
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.contents.get(key)
    }

    /// Set `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.contents.insert(key.into(), value.into())
    }

    /// Remove `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.contents.shift_remove(key)
    }

    /// Set every entry of `entries`, in order.
    pub fn update<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// Reset the contents to the format's empty value without writing.
    pub fn clear(&mut self) {
        self.contents = self.spec.create_empty();
    }

    /// A deep copy of the contents.
    pub fn as_value(&self) -> Value {
        Value::Object(self.contents.clone())
    }

    /// Turn this file into a guard that writes it when dropped.
    pub fn guard(self) -> FileGuard {
        FileGuard {
            file: self,
            armed: true,
        }
    }
}

// ---------------------------------------------------------------------------
// FileGuard
// ---------------------------------------------------------------------------

/// Scoped access to a [`PersistentFile`].
///
/// Dropping the guard writes the file; a write error at that point can only
/// be logged. Call [`FileGuard::commit`] to write and observe the result.
#[derive(Debug)]
pub struct FileGuard {
    file: PersistentFile,
    armed: bool,
}

impl FileGuard {
    /// Write the file now and release it.
    pub fn commit(mut self) -> Result<()> {
        self.armed = false;
        self.file.write()
    }

    /// Release the file without writing it.
    pub fn discard(mut self) {
        self.armed = false;
    }
}

impl Deref for FileGuard {
    type Target = PersistentFile;

    fn deref(&self) -> &PersistentFile {
        &self.file
    }
}

impl DerefMut for FileGuard {
    fn deref_mut(&mut self) -> &mut PersistentFile {
        &mut self.file
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(err) = self.file.write() {
            log::warn!(
                "failed to write {} on scope exit: {err}",
                self.file.path().display()
            );
        }
    }
}
