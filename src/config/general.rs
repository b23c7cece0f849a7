//! The general configuration settings for fen.
//!
//! This module defines the [General] struct for deserializing
//! general settings from the fen.toml configuration file
//! and the [InternalGeneral] struct for internal use within fen.

use crate::core::worker::{MAX_FILE_OP_WORKERS, default_worker_count};
use crate::core::{ListOptions, SortBy};
use crate::utils::cli::CliOverrides;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    folders_first: bool,
    show_hidden: bool,
    sort_by: SortBy,
    sort_reverse: bool,
    no_write: bool,
    file_op_workers: usize,
}

impl Default for General {
    fn default() -> Self {
        General {
            folders_first: true,
            show_hidden: false,
            sort_by: SortBy::Name,
            sort_reverse: false,
            no_write: false,
            file_op_workers: 0,
        }
    }
}

#[derive(Debug)]
pub struct InternalGeneral {
    list_options: ListOptions,
    no_write: bool,
    file_op_workers: usize,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            list_options: ListOptions {
                sort_by: g.sort_by,
                reverse: g.sort_reverse,
                show_hidden: g.show_hidden,
                folders_first: g.folders_first,
            },
            no_write: g.no_write,
            file_op_workers: resolve_workers(g.file_op_workers),
        }
    }
}

impl InternalGeneral {
    /// Listing preferences at startup. The app keeps its own copy for runtime toggles.
    #[inline]
    pub fn list_options(&self) -> ListOptions {
        self.list_options
    }

    #[inline]
    pub fn no_write(&self) -> bool {
        self.no_write
    }

    /// Resolved pool size, never 0.
    #[inline]
    pub fn file_op_workers(&self) -> usize {
        self.file_op_workers
    }

    /// Command-line flags win over fen.toml.
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        let opts = &mut self.list_options;
        if let Some(v) = overrides.show_hidden {
            opts.show_hidden = v;
        }
        if let Some(v) = overrides.folders_first {
            opts.folders_first = v;
        }
        if let Some(v) = overrides.sort_by {
            opts.sort_by = v;
        }
        if let Some(v) = overrides.sort_reverse {
            opts.reverse = v;
        }
        if let Some(v) = overrides.no_write {
            self.no_write = v;
        }
    }
}

/// 0 means automatic. Explicit values are clamped to the pool limit.
fn resolve_workers(value: usize) -> usize {
    if value == 0 {
        return default_worker_count();
    }
    let clamped = value.min(MAX_FILE_OP_WORKERS);
    if clamped != value {
        eprintln!(
            "[Warning] file_op_workers={} out of range (1..={}), clamped to {}",
            value, MAX_FILE_OP_WORKERS, clamped
        );
    }
    clamped
}
