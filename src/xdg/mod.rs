//! XDG base directories and per-application path resolution.
//!
//! [`Xdg`] is an immutable snapshot of the six XDG base-directory variables.
//! [`AppPaths`] joins that snapshot with an application name to produce the
//! home directory and ordered search list for config, data and cache files.
//!
//! ```rust,no_run
//! use xdg_appfiles::xdg::{AppPaths, Xdg};
//!
//! let xdg = Xdg::from_env();
//! let paths = AppPaths::resolve(&xdg, "my-app").unwrap();
//! assert_eq!(paths.config_dirs[0], paths.config_home);
//! ```

pub mod env;
pub mod paths;

pub use env::{expand_vars, Xdg, XdgVar};
pub use paths::{check_name, AppPaths};
