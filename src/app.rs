//! The per-application entry point.
//!
//! An [`App`] bundles everything derived from one application name: the XDG
//! snapshot it was resolved against, the resolved paths, and ready-to-use
//! config, data and cache handles.

use crate::cache::{Cache, CacheDirectory};
use crate::error::Result;
use crate::files::SearchDirectory;
use crate::format::{Format, FormatRegistry};
use crate::settings::Settings;
use crate::xdg::{AppPaths, Xdg};

/// Config, data and cache locations for one application.
#[derive(Debug, Clone)]
pub struct App {
    /// The application name, used as a directory name under every base
    /// directory.
    pub name: String,
    /// The environment snapshot the paths were resolved from.
    pub xdg: Xdg,
    pub paths: AppPaths,
    /// Default format for config and data files.
    pub format: Format,
    /// Config files: written under `$XDG_CONFIG_HOME/<name>`.
    pub config: SearchDirectory,
    /// Data files: written under `$XDG_DATA_HOME/<name>`.
    pub data: SearchDirectory,
    /// Cache directories under `$XDG_CACHE_HOME/<name>`.
    pub cache: Cache,
    settings: Settings,
}

impl App {
    /// Build an app from the current environment and default settings
    /// (with the `CFGS_FORMAT` override applied).
    pub fn new(name: &str) -> Result<Self> {
        Self::with_settings(name, &Settings::from_env(), Xdg::from_env())
    }

    /// Build an app from explicit settings and an explicit XDG snapshot.
    ///
    /// Fails on a bad name or unknown format before touching the filesystem.
    pub fn with_settings(name: &str, settings: &Settings, xdg: Xdg) -> Result<Self> {
        let paths = AppPaths::resolve(&xdg, name)?;
        let format = settings.format()?;
        let registry = FormatRegistry::new(format);
        let options = settings.format_options();

        let config = SearchDirectory::new(
            paths.config_home.clone(),
            paths.config_dirs.clone(),
            registry,
            options,
        );
        let data = SearchDirectory::new(
            paths.data_home.clone(),
            paths.data_dirs.clone(),
            registry,
            options,
        );
        let cache = Cache::with_default_name(
            paths.cache_home.clone(),
            settings.cache_dir_name.clone(),
        );

        log::debug!(
            "resolved {name}: config {}, data {}, cache {}",
            paths.config_home.display(),
            paths.data_home.display(),
            paths.cache_home.display()
        );

        Ok(Self {
            name: name.to_string(),
            xdg,
            paths,
            format,
            config,
            data,
            cache,
            settings: settings.clone(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The default cache directory, sized by the configured budget.
    pub fn default_cache(&self) -> Result<CacheDirectory> {
        self.cache.default_directory(self.settings.cache_budget)
    }
}
