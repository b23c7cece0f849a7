//! Per-directory memory of the last highlighted child.
//!
//! Keys and values are absolute paths: the key is a directory, the value the child that was
//! selected in it the last time the user was there. Lives for the whole process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct DirHistory {
    last_selected: HashMap<PathBuf, PathBuf>,
}

impl DirHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers `path` as the selection of its parent directory. No-op for the root.
    pub fn record(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.last_selected
                .insert(parent.to_path_buf(), path.to_path_buf());
        }
    }

    #[inline]
    pub fn lookup(&self, dir: &Path) -> Option<&Path> {
        self.last_selected.get(dir).map(PathBuf::as_path)
    }

    /// Drops every mapping pointing at `path` (after a rename, move or delete).
    pub fn forget(&mut self, path: &Path) {
        self.last_selected.retain(|_, selected| selected != path);
    }
}
