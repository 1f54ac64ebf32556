//! tane core - shared helpers for all tane crates.
//!
//! - **config**: State directory, env loading and path expansion
//! - **text**: Truncation helpers for notifications and terminal output

pub mod config;
pub mod text;

// Re-export commonly used items for convenience
pub use config::{
    default_cookie_file, env_file, expand_path, load_env, state_dir,
    BASE_URL_ENV, PASSWORD_ENV, STATE_DIR_ENV, USER_ENV,
};
pub use text::{one_line, truncate};
