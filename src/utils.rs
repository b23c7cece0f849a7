//! Miscellaneous utility functions for fen.
//!
//! This module holds the [helpers] submodule, which provides commonly used utilities such as:
//! - Recursive copy and removal used by the file operations engine
//! - Computing a collision-free destination for pastes
//! - Opening a file in the configured or an explicitly chosen program
//! - Shortening the home directory path to "~"
//!
//! and the [cli] submodule with the command-line handling of the `fen` binary.

pub mod cli;
pub mod helpers;

pub use helpers::{
    copy_recursive, get_home, open_path, path_exists, remove_path,
    resolve_initial_dir, resolve_opener, shorten_home_path, unique_path, validate_name,
};
