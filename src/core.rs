//! Core runtime logic for fen.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [fm]: directory listing and file metadata (see [list_dir], [DirEntry], [FileInfo]).
//! - [formatter]: sort/filter options and display formatting of sizes, times and attributes.
//! - [worker]: the background file operations engine ([FileOps]).
//! - [status]: the single-slot status message sink shared with the workers.
//! - [error]: the error type every fallible core operation returns.
//! - [terminal]: terminal setup/teardown and the main crossterm/ratatui event loop.

pub mod error;
pub mod fm;
pub mod formatter;
pub mod status;
pub mod terminal;
pub mod worker;

pub use error::{Error, Result};
pub use fm::{DirEntry, EntryKind, FileInfo, list_dir, read_entries};
pub use formatter::{
    ListOptions, SortBy, format_attributes, format_file_size, format_file_time,
    sanitize_to_exact_width,
};
pub use status::{StatusKind, StatusMessage, StatusSink};
pub use worker::{FileOpOutcome, FileOpRequest, FileOps, default_worker_count};
