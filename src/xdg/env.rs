//! Snapshot of the XDG base-directory variables.
//!
//! Each variable is taken from its environment override when that is
//! non-empty, otherwise from a default template such as `$HOME/.cache` with
//! `$NAME` / `${NAME}` references expanded.
//!
//! | Variable          | Default                          |
//! |-------------------|----------------------------------|
//! | `XDG_CACHE_HOME`  | `$HOME/.cache`                   |
//! | `XDG_CONFIG_DIRS` | `/etc/xdg`                       |
//! | `XDG_CONFIG_HOME` | `$HOME/.config`                  |
//! | `XDG_DATA_DIRS`   | `/usr/local/share/:/usr/share/`  |
//! | `XDG_DATA_HOME`   | `$HOME/.local/share`             |
//! | `XDG_RUNTIME_DIR` | *(empty)*                        |

// ---------------------------------------------------------------------------
// XdgVar
// ---------------------------------------------------------------------------

/// One of the six base-directory variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XdgVar {
    CacheHome,
    ConfigDirs,
    ConfigHome,
    DataDirs,
    DataHome,
    RuntimeDir,
}

impl XdgVar {
    pub const ALL: [XdgVar; 6] = [
        XdgVar::CacheHome,
        XdgVar::ConfigDirs,
        XdgVar::ConfigHome,
        XdgVar::DataDirs,
        XdgVar::DataHome,
        XdgVar::RuntimeDir,
    ];

    /// Environment variable name.
    pub fn name(self) -> &'static str {
        match self {
            XdgVar::CacheHome => "XDG_CACHE_HOME",
            XdgVar::ConfigDirs => "XDG_CONFIG_DIRS",
            XdgVar::ConfigHome => "XDG_CONFIG_HOME",
            XdgVar::DataDirs => "XDG_DATA_DIRS",
            XdgVar::DataHome => "XDG_DATA_HOME",
            XdgVar::RuntimeDir => "XDG_RUNTIME_DIR",
        }
    }

    /// Default template used when the variable is unset or empty.
    pub fn default_template(self) -> &'static str {
        match self {
            XdgVar::CacheHome => "$HOME/.cache",
            XdgVar::ConfigDirs => "/etc/xdg",
            XdgVar::ConfigHome => "$HOME/.config",
            XdgVar::DataDirs => "/usr/local/share/:/usr/share/",
            XdgVar::DataHome => "$HOME/.local/share",
            XdgVar::RuntimeDir => "",
        }
    }

    /// `true` for the colon-separated `*_DIRS` list variables.
    pub fn is_list(self) -> bool {
        matches!(self, XdgVar::ConfigDirs | XdgVar::DataDirs)
    }
}

// ---------------------------------------------------------------------------
// Xdg
// ---------------------------------------------------------------------------

/// The six XDG base directories as of when the snapshot was taken.
///
/// A snapshot never re-reads the environment; build a new one to observe
/// changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xdg {
    pub cache_home: String,
    pub config_dirs: String,
    pub config_home: String,
    pub data_dirs: String,
    pub data_home: String,
    pub runtime_dir: String,
}

impl Xdg {
    /// Snapshot the process environment.
    ///
    /// `HOME` falls back to [`dirs::home_dir`] when it is not set, so the
    /// default templates still expand on platforms without that variable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| {
            let value = std::env::var(key).ok();
            if value.is_none() && key == "HOME" {
                return dirs::home_dir().map(|home| home.to_string_lossy().into_owned());
            }
            value
        })
    }

    /// Snapshot using an arbitrary variable lookup.
    ///
    /// The same lookup serves both the `XDG_*` overrides and the expansion of
    /// `$NAME` references in the default templates.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: XdgVar| match lookup(var.name()) {
            Some(value) if !value.is_empty() => value,
            _ => expand_vars(var.default_template(), &lookup),
        };

        Self {
            cache_home: get(XdgVar::CacheHome),
            config_dirs: get(XdgVar::ConfigDirs),
            config_home: get(XdgVar::ConfigHome),
            data_dirs: get(XdgVar::DataDirs),
            data_home: get(XdgVar::DataHome),
            runtime_dir: get(XdgVar::RuntimeDir),
        }
    }

    /// Raw value of one variable.
    pub fn get(&self, var: XdgVar) -> &str {
        match var {
            XdgVar::CacheHome => &self.cache_home,
            XdgVar::ConfigDirs => &self.config_dirs,
            XdgVar::ConfigHome => &self.config_home,
            XdgVar::DataDirs => &self.data_dirs,
            XdgVar::DataHome => &self.data_home,
            XdgVar::RuntimeDir => &self.runtime_dir,
        }
    }

    /// A `*_DIRS` variable split on `:`, with empty segments dropped.
    pub fn dirs(&self, var: XdgVar) -> Vec<&str> {
        split_dirs(self.get(var))
    }
}

pub(crate) fn split_dirs(value: &str) -> Vec<&str> {
    value.split(':').filter(|dir| !dir.is_empty()).collect()
}

// ---------------------------------------------------------------------------
// Variable expansion
// ---------------------------------------------------------------------------

/// Expand `$NAME` and `${NAME}` references using `lookup`.
///
/// Names are ASCII alphanumerics and `_`. References to unknown variables,
/// and a `$` that does not start a reference, are left as written.
pub fn expand_vars<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let is_name_char = |c: char| c.is_ascii_alphanumeric() || c == '_';

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
            (&after[..end], end)
        };

        let value = if name.is_empty() { None } else { lookup(name) };
        match value {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + 1 + consumed]),
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}
