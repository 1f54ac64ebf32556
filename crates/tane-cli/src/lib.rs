//! tane command line library.
//!
//! Argument parsing lives in [`cli`]; [`commands`] restores or creates the
//! Noctane session and runs the watch loop or a single poll.

pub mod cli;
pub mod commands;
