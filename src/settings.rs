//! Library settings, defaults and TOML persistence.
//!
//! [`Settings`] controls the defaults an [`App`](crate::App) is built with:
//! which format config and data files use, how they are written, and how the
//! default cache directory is named and sized.
//!
//! | Field            | Default  | Environment override |
//! |------------------|----------|----------------------|
//! | `default_format` | `"json"` | `CFGS_FORMAT`        |
//! | `pretty`         | `true`   |                      |
//! | `sort_keys`      | `false`  |                      |
//! | `cache_dir_name` | `"cache"`|                      |
//! | `cache_budget`   | `0`      |                      |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_DIR_NAME;
use crate::error::{CfgsError, Result};
use crate::format::{Format, FormatOptions};

/// Environment variable that overrides [`Settings::default_format`].
pub const FORMAT_ENV_VAR: &str = "CFGS_FORMAT";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Defaults applied when building an [`App`](crate::App).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Format used for files whose suffix does not name one.
    pub default_format: String,
    /// Indent JSON and spread TOML arrays over several lines.
    pub pretty: bool,
    /// Write mapping keys in sorted order.
    pub sort_keys: bool,
    /// Name of the cache directory returned by `Cache::default_directory`.
    pub cache_dir_name: String,
    /// Byte budget for the default cache directory; `0` is unlimited.
    pub cache_budget: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: Format::Json.name().into(),
            pretty: true,
            sort_keys: false,
            cache_dir_name: DEFAULT_CACHE_DIR_NAME.into(),
            cache_budget: 0,
        }
    }
}

impl Settings {
    /// Defaults with the `CFGS_FORMAT` override applied when it is set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(format) = lookup(FORMAT_ENV_VAR).filter(|value| !value.is_empty()) {
            settings.default_format = format;
        }
        settings
    }

    /// Load settings from a TOML file.
    ///
    /// Returns `Ok(Settings::default())` when the file does not exist; fields
    /// missing from the file keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        toml::from_str(&content).map_err(|e| CfgsError::Settings {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Save settings as TOML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| CfgsError::Settings {
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The configured default format, validated.
    pub fn format(&self) -> Result<Format> {
        Format::from_name(&self.default_format)
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            pretty: self.pretty,
            sort_keys: self.sort_keys,
        }
    }
}
