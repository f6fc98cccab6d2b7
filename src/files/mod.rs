//! Persistent config and data files.
//!
//! # Usage
//!
//! ```rust,no_run
//! use xdg_appfiles::App;
//!
//! let app = App::new("my-app").unwrap();
//!
//! // Written back to ~/.config/my-app/my-app.json when the guard drops.
//! let mut file = app.config.open_guarded(None).unwrap();
//! file.set("theme", "dark");
//! ```

pub mod directory;
pub mod persistent;

pub use directory::{FindAll, SearchDirectory};
pub use persistent::{FileGuard, PersistentFile};
