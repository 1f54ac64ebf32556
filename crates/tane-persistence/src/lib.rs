//! Persistence layer for tane.
//!
//! Crash-safe file writes (write to temp file, then rename) and the
//! on-disk cookie store that lets a restart skip the sign-in prompt.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tane_persistence::{load_cookie_store, save_cookie_store};
//!
//! let path = Path::new("/home/user/.tane/cookies.json");
//! let store = load_cookie_store(path).unwrap().into_store();
//! save_cookie_store(path, &store).unwrap();
//! ```

pub mod atomic;
pub mod cookies;
pub mod error;

pub use atomic::{atomic_write, touch};
pub use cookies::{load_cookie_store, save_cookie_store, CookieLoad};
pub use error::{PersistenceError, Result};
