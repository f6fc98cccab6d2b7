//! Config and data directories with an ordered search list.
//!
//! Reads may be satisfied by any directory in the search list; writes only
//! ever go to the home directory, which is always the first entry.

use std::path::{Path, PathBuf};

use super::persistent::{FileGuard, PersistentFile};
use crate::error::Result;
use crate::format::{Format, FormatOptions, FormatRegistry};

// ---------------------------------------------------------------------------
// SearchDirectory
// ---------------------------------------------------------------------------

/// A home directory plus the directories searched after it.
#[derive(Debug, Clone)]
pub struct SearchDirectory {
    home: PathBuf,
    dirs: Vec<PathBuf>,
    registry: FormatRegistry,
    options: FormatOptions,
}

impl SearchDirectory {
    /// `home` is put at the front of `dirs` unless it is already there.
    pub fn new(
        home: impl Into<PathBuf>,
        dirs: Vec<PathBuf>,
        registry: FormatRegistry,
        options: FormatOptions,
    ) -> Self {
        let home = home.into();
        let mut dirs = dirs;
        if dirs.first() != Some(&home) {
            dirs.insert(0, home.clone());
        }
        Self {
            home,
            dirs,
            registry,
            options,
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The search list, home first.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Path of `filename` inside the home directory.
    ///
    /// Leading `/` characters are ignored so that every name stays relative to
    /// the home directory.
    pub fn full_path(&self, filename: &str) -> PathBuf {
        self.home.join(relative(filename))
    }

    /// `<basename of home><canonical suffix of the default format>`.
    pub fn default_filename(&self) -> String {
        self.filename_with_suffix(self.registry.default_format().suffix())
    }

    fn filename_with_suffix(&self, suffix: &str) -> String {
        let stem = self
            .home
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{stem}{suffix}")
    }

    /// Open a file in the home directory.
    ///
    /// With no `filename` the default file name is used. The format follows
    /// the file suffix, falling back to the directory's default format.
    pub fn open(&self, filename: Option<&str>) -> Result<PersistentFile> {
        self.open_impl(filename, None)
    }

    /// Open a file in the home directory in an explicitly named format.
    pub fn open_with_format(&self, filename: Option<&str>, format: &str) -> Result<PersistentFile> {
        self.open_impl(filename, Some(format))
    }

    /// Like [`open`](Self::open), but the file is written when the returned
    /// guard is dropped.
    pub fn open_guarded(&self, filename: Option<&str>) -> Result<FileGuard> {
        Ok(self.open(filename)?.guard())
    }

    /// Open a file, run `f` on it, and write it back whether `f` succeeds or
    /// fails.
    ///
    /// An error from `f` takes precedence over an error from the write.
    pub fn with_file<T, F>(&self, filename: Option<&str>, f: F) -> Result<T>
    where
        F: FnOnce(&mut PersistentFile) -> Result<T>,
    {
        let mut guard = self.open_guarded(filename)?;
        let outcome = f(&mut *guard);
        let written = guard.commit();
        let value = outcome?;
        written?;
        Ok(value)
    }

    fn open_impl(&self, filename: Option<&str>, explicit: Option<&str>) -> Result<PersistentFile> {
        let filename = match filename.map(relative) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let format = match explicit {
                    Some(name) => Format::from_name(name)?,
                    None => self.registry.default_format(),
                };
                self.filename_with_suffix(format.suffix())
            }
        };

        let spec = self.registry.resolve(explicit, &filename)?;
        PersistentFile::open(self.home.join(&filename), spec, self.options)
    }

    /// Every existing `filename` along the search list, home first.
    ///
    /// The walk is lazy: each directory is probed only when the next item is
    /// requested. Missing files are skipped; any other I/O error is yielded.
    /// Calling this again starts a fresh walk.
    pub fn find_all<'a>(&'a self, filename: &'a str) -> FindAll<'a> {
        FindAll {
            dirs: self.dirs.iter(),
            filename: relative(filename),
        }
    }
}

fn relative(filename: &str) -> &str {
    filename.trim_start_matches('/')
}

// ---------------------------------------------------------------------------
// FindAll
// ---------------------------------------------------------------------------

/// Iterator returned by [`SearchDirectory::find_all`].
#[derive(Debug, Clone)]
pub struct FindAll<'a> {
    dirs: std::slice::Iter<'a, PathBuf>,
    filename: &'a str,
}

impl Iterator for FindAll<'_> {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        for dir in self.dirs.by_ref() {
            let path = dir.join(self.filename);
            let file = match std::fs::File::open(&path) {
                Ok(file) => file,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => return Some(Err(err.into())),
            };
            match file.metadata() {
                Ok(meta) if meta.is_file() => return Some(Ok(path)),
                Ok(_) => continue,
                Err(err) => return Some(Err(err.into())),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn search_dir(root: &Path, default: Format) -> SearchDirectory {
        SearchDirectory::new(
            root.join("home/test"),
            vec![root.join("etc/xdg/test"), root.join("usr/share/test")],
            FormatRegistry::new(default),
            FormatOptions::default(),
        )
    }

    #[test]
    fn home_is_prepended_once() {
        let root = Path::new("/r");
        let dir = search_dir(root, Format::Json);
        assert_eq!(dir.dirs()[0], dir.home());
        assert_eq!(dir.dirs().len(), 3);

        let again = SearchDirectory::new(
            dir.home().to_path_buf(),
            dir.dirs().to_vec(),
            FormatRegistry::default(),
            FormatOptions::default(),
        );
        assert_eq!(again.dirs(), dir.dirs());
    }

    #[test]
    fn default_filename_uses_home_basename() {
        let dir = search_dir(Path::new("/r"), Format::Yaml);
        assert_eq!(dir.default_filename(), "test.yml");
    }

    #[test]
    fn leading_slash_stays_inside_home() {
        let dir = search_dir(Path::new("/r"), Format::Json);
        assert_eq!(dir.full_path("/x.json"), PathBuf::from("/r/home/test/x.json"));
    }

    #[test]
    fn open_default_file_in_home() {
        let tmp = tempdir().expect("temp dir");
        let dir = search_dir(tmp.path(), Format::Json);

        let file = dir.open(None).expect("open");
        assert_eq!(file.path(), tmp.path().join("home/test/test.json"));
        assert_eq!(file.format(), Format::Json);
        assert!(file.contents().is_empty());
    }

    #[test]
    fn suffix_overrides_directory_default() {
        let tmp = tempdir().expect("temp dir");
        let dir = search_dir(tmp.path(), Format::Json);

        assert_eq!(dir.open(Some("a.toml")).unwrap().format(), Format::Toml);
        assert_eq!(dir.open(Some("a.cfg")).unwrap().format(), Format::Ini);
        assert_eq!(dir.open(Some("special")).unwrap().format(), Format::Json);
    }

    #[test]
    fn explicit_format_names_the_default_file() {
        let tmp = tempdir().expect("temp dir");
        let dir = search_dir(tmp.path(), Format::Json);

        let file = dir.open_with_format(None, "toml").expect("open");
        assert_eq!(file.format(), Format::Toml);
        assert!(file.path().ends_with("test.toml"));
    }

    #[test]
    fn unknown_explicit_format_touches_nothing() {
        let tmp = tempdir().expect("temp dir");
        let dir = search_dir(tmp.path(), Format::Json);

        let err = dir.open_with_format(Some("x"), "wombat").expect_err("unknown");
        assert!(matches!(err, crate::CfgsError::UnknownFormat(_)));
        assert!(!dir.home().exists());
    }

    #[test]
    fn with_file_writes_even_when_closure_fails() {
        let tmp = tempdir().expect("temp dir");
        let dir = search_dir(tmp.path(), Format::Json);

        let result: Result<()> = dir.with_file(None, |f| {
            f.set("saved", true);
            Err(crate::CfgsError::InvalidFilename("boom".into()))
        });
        assert!(result.is_err());

        let reopened = dir.open(None).unwrap();
        assert_eq!(reopened.get("saved"), Some(&json!(true)));
    }

    #[test]
    fn find_all_walks_search_list_in_order() {
        let tmp = tempdir().expect("temp dir");
        let dir = search_dir(tmp.path(), Format::Json);

        for path in [
            tmp.path().join("usr/share/wombat.json"),
            tmp.path().join("etc/xdg/test/wombat.json"),
            tmp.path().join("usr/share/test/wombat.json"),
            tmp.path().join("wombat.json"),
        ] {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "{}").unwrap();
        }

        let found: Vec<_> = dir.find_all("wombat.json").collect::<Result<_>>().unwrap();
        assert_eq!(
            found,
            vec![
                tmp.path().join("etc/xdg/test/wombat.json"),
                tmp.path().join("usr/share/test/wombat.json"),
            ]
        );

        // A second walk sees files created since the first.
        std::fs::create_dir_all(dir.home()).unwrap();
        std::fs::write(dir.home().join("wombat.json"), "{}").unwrap();
        let again: Vec<_> = dir.find_all("wombat.json").collect::<Result<_>>().unwrap();
        assert_eq!(again.len(), 3);
        assert_eq!(again[0], dir.home().join("wombat.json"));
    }

    #[test]
    fn find_all_is_lazy() {
        let tmp = tempdir().expect("temp dir");
        let dir = search_dir(tmp.path(), Format::Json);
        for sub in ["home/test", "etc/xdg/test"] {
            let d = tmp.path().join(sub);
            std::fs::create_dir_all(&d).unwrap();
            std::fs::write(d.join("f"), "").unwrap();
        }

        let mut walk = dir.find_all("f");
        assert_eq!(walk.next().unwrap().unwrap(), tmp.path().join("home/test/f"));

        // Removing a later match before it is reached hides it from the walk.
        std::fs::remove_file(tmp.path().join("etc/xdg/test/f")).unwrap();
        assert!(walk.next().is_none());
    }

    #[test]
    fn find_all_skips_directories() {
        let tmp = tempdir().expect("temp dir");
        let dir = search_dir(tmp.path(), Format::Json);
        std::fs::create_dir_all(dir.home().join("sub")).unwrap();

        assert_eq!(dir.find_all("sub").count(), 0);
    }

    #[test]
    fn find_all_yields_other_io_errors_and_keeps_walking() {
        let tmp = tempdir().expect("temp dir");
        let dir = search_dir(tmp.path(), Format::Json);
        for path in [
            dir.home().join("wombat.json"),
            tmp.path().join("usr/share/test/wombat.json"),
        ] {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "{}").unwrap();
        }
        // A search directory that is really a file fails with ENOTDIR.
        std::fs::create_dir_all(tmp.path().join("etc/xdg")).unwrap();
        std::fs::write(tmp.path().join("etc/xdg/test"), "").unwrap();

        let found: Vec<_> = dir.find_all("wombat.json").collect();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].as_ref().unwrap(), &dir.home().join("wombat.json"));
        assert!(matches!(found[1], Err(crate::error::CfgsError::Io(_))));
        assert_eq!(
            found[2].as_ref().unwrap(),
            &tmp.path().join("usr/share/test/wombat.json")
        );
    }
}
