//! Config, data and cache files in XDG base directories.
//!
//! # Overview
//!
//! ```text
//!   Xdg (env snapshot) ──┐
//!                        ├─▶ AppPaths ──▶ SearchDirectory (config, data) ──▶ PersistentFile
//!   app name ────────────┘            └─▶ Cache ──▶ CacheDirectory (size-bounded)
//! ```
//!
//! - [`xdg`]: the six XDG variables and per-application path resolution.
//! - [`format`]: JSON, TOML, YAML and ini codecs behind one table.
//! - [`files`]: search-path lookup and load/edit/save of formatted files.
//! - [`cache`]: flat cache directories with oldest-first eviction.
//! - [`settings`]: library defaults, persisted as TOML.
//!
//! Nothing here locks files: one writer per config file or cache directory
//! is assumed.

pub mod app;
pub mod cache;
pub mod error;
pub mod files;
pub mod format;
pub mod settings;
pub mod xdg;

pub use app::App;
pub use error::{CfgsError, Result};
pub use format::{Contents, Format, FormatOptions};
pub use settings::Settings;
