//! Per-application directories derived from an [`Xdg`] snapshot.
//!
//! Layout for an application called `app`:
//!
//!   Config home:   `$XDG_CONFIG_HOME/app/`
//!   Config search: `$XDG_CONFIG_HOME/app/`, then each `$XDG_CONFIG_DIRS` entry `/app/`
//!   Data home:     `$XDG_DATA_HOME/app/`
//!   Data search:   `$XDG_DATA_HOME/app/`, then each `$XDG_DATA_DIRS` entry `/app/`
//!   Cache root:    `$XDG_CACHE_HOME/app/`

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::env::{split_dirs, Xdg};
use crate::error::{CfgsError, Result};

/// Characters that may not appear in an application name.
///
/// This is a heuristic: a name can pass and still be unusable on some
/// platforms (`CON` on Windows, for instance).
const BAD_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>', '\'', ';'];

/// Reject names that are empty or contain any of [`BAD_CHARS`].
pub fn check_name(name: &str) -> Result<()> {
    let bad: BTreeSet<char> = name.chars().filter(|c| BAD_CHARS.contains(c)).collect();
    if name.is_empty() || !bad.is_empty() {
        return Err(CfgsError::InvalidName {
            name: name.to_string(),
            chars: bad.into_iter().collect(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// AppPaths
// ---------------------------------------------------------------------------

/// Holds all resolved application directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Root for this application's cache directories.
    pub cache_home: PathBuf,
    /// Directory config files are written to.
    pub config_home: PathBuf,
    /// Config search list; `config_home` is always at index 0.
    pub config_dirs: Vec<PathBuf>,
    /// Directory data files are written to.
    pub data_home: PathBuf,
    /// Data search list; `data_home` is always at index 0.
    pub data_dirs: Vec<PathBuf>,
    /// Per-application runtime directory, when `XDG_RUNTIME_DIR` is set.
    pub runtime_dir: Option<PathBuf>,
}

impl AppPaths {
    /// Join every base directory in `xdg` with `name`.
    ///
    /// Pure: the same snapshot and name always give the same paths, and no
    /// directory is created.
    pub fn resolve(xdg: &Xdg, name: &str) -> Result<Self> {
        check_name(name)?;

        let home = |base: &str| Path::new(base).join(name);
        let search = |home: &PathBuf, dirs: &str| {
            std::iter::once(home.clone())
                .chain(split_dirs(dirs).into_iter().map(|dir| Path::new(dir).join(name)))
                .collect::<Vec<_>>()
        };

        let config_home = home(&xdg.config_home);
        let data_home = home(&xdg.data_home);
        let config_dirs = search(&config_home, &xdg.config_dirs);
        let data_dirs = search(&data_home, &xdg.data_dirs);
        let runtime_dir = (!xdg.runtime_dir.is_empty()).then(|| home(&xdg.runtime_dir));

        Ok(Self {
            cache_home: home(&xdg.cache_home),
            config_home,
            config_dirs,
            data_home,
            data_dirs,
            runtime_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_xdg() -> Xdg {
        Xdg::from_lookup(|key: &str| match key {
            "HOME" => Some("/usr/fake".to_string()),
            _ => None,
        })
    }

    #[test]
    fn home_is_first_search_entry() {
        let paths = AppPaths::resolve(&fake_xdg(), "test").expect("resolve");

        assert_eq!(paths.config_home, PathBuf::from("/usr/fake/.config/test"));
        assert_eq!(
            paths.config_dirs,
            vec![
                PathBuf::from("/usr/fake/.config/test"),
                PathBuf::from("/etc/xdg/test"),
            ]
        );
        assert_eq!(paths.data_home, PathBuf::from("/usr/fake/.local/share/test"));
        assert_eq!(
            paths.data_dirs,
            vec![
                PathBuf::from("/usr/fake/.local/share/test"),
                PathBuf::from("/usr/local/share/test"),
                PathBuf::from("/usr/share/test"),
            ]
        );
        assert_eq!(paths.cache_home, PathBuf::from("/usr/fake/.cache/test"));
        assert_eq!(paths.runtime_dir, None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let xdg = fake_xdg();
        let a = AppPaths::resolve(&xdg, "app").expect("resolve");
        let b = AppPaths::resolve(&xdg, "app").expect("resolve");
        assert_eq!(a, b);
    }

    #[test]
    fn runtime_dir_joins_name_when_set() {
        let mut xdg = fake_xdg();
        xdg.runtime_dir = "/var/rt".into();
        let paths = AppPaths::resolve(&xdg, "app").expect("resolve");
        assert_eq!(paths.runtime_dir, Some(PathBuf::from("/var/rt/app")));
    }

    #[test]
    fn search_order_follows_declaration() {
        let mut xdg = fake_xdg();
        xdg.config_dirs = "/z:/a:/m".into();
        let paths = AppPaths::resolve(&xdg, "app").expect("resolve");
        assert_eq!(
            paths.config_dirs[1..],
            [
                PathBuf::from("/z/app"),
                PathBuf::from("/a/app"),
                PathBuf::from("/m/app"),
            ]
        );
    }

    #[test]
    fn bad_characters_are_reported_sorted() {
        let err = AppPaths::resolve(&fake_xdg(), "/\\?:|*<\"%").expect_err("bad name");
        match err {
            CfgsError::InvalidName { chars, .. } => assert_eq!(chars, "\"%*/:<?\\|"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_reserved_character_is_rejected() {
        for c in BAD_CHARS {
            let name = format!("app{c}name");
            assert!(check_name(&name).is_err(), "{name:?} should be rejected");
        }
        assert!(check_name("").is_err());
        assert!(check_name("my-app_2.0").is_ok());
    }
}
