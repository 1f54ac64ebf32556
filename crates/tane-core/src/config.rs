//! Shared configuration for tane.
//!
//! Provides functions to locate tane's state directory, load environment
//! overrides and resolve the cookie store path.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.tane/
//! ├── .env.local    # TANE_USER, TANE_BASE_URL, ...
//! └── cookies.json  # Suggested cookie store location
//! ```
//!
//! # Environment Variables
//!
//! - `TANE_STATE_DIR`: Override the base state directory
//! - `TANE_BASE_URL`: Override the remote site root
//! - `TANE_USER`: Default sign-in user name
//! - `TANE_PASSWORD`: Non-interactive password (first attempt only)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "TANE_STATE_DIR";

/// Environment variable for the remote site root.
pub const BASE_URL_ENV: &str = "TANE_BASE_URL";

/// Environment variable for the default user name.
pub const USER_ENV: &str = "TANE_USER";

/// Environment variable for a non-interactive password.
pub const PASSWORD_ENV: &str = "TANE_PASSWORD";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".tane";

/// Name of the env file loaded at startup.
const ENV_FILE: &str = ".env.local";

/// Default cookie store file name.
const COOKIE_FILE: &str = "cookies.json";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the tane state directory.
///
/// The state directory is determined by:
/// 1. `TANE_STATE_DIR` environment variable if set
/// 2. `~/.tane` if home directory is available
/// 3. `.tane` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the `.env.local` path in the state directory.
pub fn env_file() -> PathBuf {
    state_dir().join(ENV_FILE)
}

/// Get the suggested cookie store path.
pub fn default_cookie_file() -> PathBuf {
    state_dir().join(COOKIE_FILE)
}

/// Load `.env.local` from the working directory and the state directory.
///
/// Values already present in the environment win; the working directory
/// file is read first so it takes precedence over the state directory one.
pub fn load_env() {
    let _ = dotenvy::from_filename(ENV_FILE);
    let path = env_file();
    if path.exists() {
        let _ = dotenvy::from_path(&path);
    }
}

/// Expand `~` and environment variables in a user-supplied path.
///
/// Falls back to the path as written when expansion fails (for example an
/// unset variable), so the caller reports the literal path in errors.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}
