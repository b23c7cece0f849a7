//! Multi-file selection and the staged yank for fen.
//!
//! The selection set holds paths the user marked. Staging a yank takes an owned snapshot of
//! that set (or of the single highlighted path when nothing is marked), tagged as copy or
//! move. Pasting consumes the snapshot.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YankMode {
    Copy,
    Move,
}

/// Staged paths waiting for a paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Yank {
    mode: YankMode,
    paths: Vec<PathBuf>,
}

impl Yank {
    #[inline]
    pub fn mode(&self) -> YankMode {
        self.mode
    }

    #[inline]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

#[derive(Debug, Default)]
pub struct Selection {
    selected: HashSet<PathBuf>,
    yank: Option<Yank>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    // Getters / Accessors

    #[inline]
    pub fn selected(&self) -> &HashSet<PathBuf> {
        &self.selected
    }

    #[inline]
    pub fn yank(&self) -> Option<&Yank> {
        self.yank.as_ref()
    }

    #[inline]
    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected.contains(path)
    }

    pub fn is_yanked(&self, path: &Path) -> bool {
        self.yank
            .as_ref()
            .is_some_and(|y| y.paths.iter().any(|p| p == path))
    }

    #[inline]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn yanked_count(&self) -> usize {
        self.yank.as_ref().map_or(0, |y| y.paths.len())
    }

    // Mutations

    /// Adds `path` to the selection, or removes it if already there.
    pub fn toggle(&mut self, path: &Path) {
        if !self.selected.remove(path) {
            self.selected.insert(path.to_path_buf());
        }
    }

    pub fn select_all<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.selected
            .extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
    }

    /// Clears both the selection and the yank. Returns true if anything was cleared.
    pub fn clear_all(&mut self) -> bool {
        let had_any = !self.selected.is_empty() || self.yank.is_some();
        self.selected.clear();
        self.yank = None;
        had_any
    }

    pub fn clear_selected(&mut self) {
        self.selected.clear();
    }

    /// Snapshots the selection (or `current` if nothing is marked) as the new yank.
    ///
    /// Returns the number of staged paths, 0 if there was nothing to stage.
    pub fn stage(&mut self, mode: YankMode, current: Option<&Path>) -> usize {
        let mut paths: Vec<PathBuf> = if self.selected.is_empty() {
            current.map(Path::to_path_buf).into_iter().collect()
        } else {
            self.selected.iter().cloned().collect()
        };

        if paths.is_empty() {
            return 0;
        }
        paths.sort();

        let count = paths.len();
        self.yank = Some(Yank { mode, paths });
        count
    }

    /// Moves the staged yank out, leaving nothing staged.
    pub fn consume(&mut self) -> Option<Yank> {
        self.yank.take()
    }

    /// Stages `paths` again after a paste could not queue them.
    pub fn restore(&mut self, mode: YankMode, paths: Vec<PathBuf>) {
        if !paths.is_empty() {
            self.yank = Some(Yank { mode, paths });
        }
    }

    /// Drops `path` from the selection and from the yank (after a rename or delete).
    pub fn remove(&mut self, path: &Path) {
        self.selected.remove(path);
        if let Some(yank) = self.yank.as_mut() {
            yank.paths.retain(|p| p != path);
            if yank.paths.is_empty() {
                self.yank = None;
            }
        }
    }

    /// Paths a delete acts on: the selection, or `current` when nothing is marked.
    pub fn targets(&self, current: Option<&Path>) -> Vec<PathBuf> {
        let mut targets: Vec<PathBuf> = if self.selected.is_empty() {
            current.map(Path::to_path_buf).into_iter().collect()
        } else {
            self.selected.iter().cloned().collect()
        };
        targets.sort();
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_and_removes() {
        let mut sel = Selection::new();
        let p = Path::new("/tmp/a");
        sel.toggle(p);
        assert!(sel.is_selected(p));
        sel.toggle(p);
        assert!(!sel.is_selected(p));
    }

    #[test]
    fn stage_prefers_selection_over_current() {
        let mut sel = Selection::new();
        sel.select_all(["/d/a", "/d/b"]);

        assert_eq!(sel.stage(YankMode::Copy, Some(Path::new("/d/c"))), 2);
        assert_eq!(
            sel.yank().map(|y| y.paths().to_vec()),
            Some(vec![PathBuf::from("/d/a"), PathBuf::from("/d/b")])
        );
        assert!(!sel.is_yanked(Path::new("/d/c")));
    }

    #[test]
    fn stage_falls_back_to_current_and_nothing() {
        let mut sel = Selection::new();
        assert_eq!(sel.stage(YankMode::Move, None), 0);
        assert!(sel.yank().is_none());

        assert_eq!(sel.stage(YankMode::Move, Some(Path::new("/d/c"))), 1);
        assert!(sel.is_yanked(Path::new("/d/c")));
        assert_eq!(sel.yank().map(Yank::mode), Some(YankMode::Move));
    }

    #[test]
    fn yank_is_a_snapshot() {
        let mut sel = Selection::new();
        sel.toggle(Path::new("/d/a"));
        sel.stage(YankMode::Copy, None);

        sel.toggle(Path::new("/d/b"));
        sel.clear_selected();
        assert_eq!(sel.yanked_count(), 1);

        let yank = sel.consume();
        assert_eq!(yank.map(|y| y.paths().len()), Some(1));
        assert!(sel.consume().is_none());
    }

    #[test]
    fn clear_all_reports_if_anything_changed() {
        let mut sel = Selection::new();
        assert!(!sel.clear_all());

        sel.stage(YankMode::Copy, Some(Path::new("/x")));
        assert!(sel.clear_all());
        assert_eq!(sel.yanked_count(), 0);
    }

    #[test]
    fn remove_drops_path_everywhere() {
        let mut sel = Selection::new();
        sel.select_all(["/d/a", "/d/b"]);
        sel.stage(YankMode::Copy, None);

        sel.remove(Path::new("/d/a"));
        assert!(!sel.is_selected(Path::new("/d/a")));
        assert!(!sel.is_yanked(Path::new("/d/a")));
        assert!(sel.is_yanked(Path::new("/d/b")));

        sel.remove(Path::new("/d/b"));
        assert!(sel.yank().is_none());
    }
}
