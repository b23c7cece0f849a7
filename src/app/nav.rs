//! Navigation state for fen.
//!
//! Owns the working directory, the highlighted path, the current listing and the
//! [DirHistory], and derives the contents of the three panes from them.
//!
//! Listings are read synchronously on every transition and on [NavState::refresh]. The
//! selection is tracked as a path rather than an index so it survives re-sorting and entries
//! appearing or vanishing underneath it.

use crate::app::history::DirHistory;
use crate::core::{DirEntry, FileInfo, ListOptions, list_dir, read_entries};

use std::path::{Path, PathBuf};

/// Lines moved by page up / page down.
pub const PAGE_STEP: usize = 10;

/// What [NavState::go_right] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoRight {
    /// Entered the selected directory.
    Entered,
    /// The selection is not a directory and should be handed to an external opener.
    Open(PathBuf),
    /// The selected directory could not be read. State is unchanged.
    Unreadable(PathBuf),
    /// Nothing is selected.
    Nothing,
}

/// Content of the right-hand pane.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Directory {
        entries: Vec<DirEntry>,
        selected: Option<usize>,
    },
    File(FileInfo),
    Empty,
}

/// Snapshot of the three panes, re-read from disk on every call.
#[derive(Debug)]
pub struct Panes<'a> {
    pub parent: Vec<DirEntry>,
    pub parent_selected: Option<usize>,
    pub current: &'a [DirEntry],
    pub current_selected: Option<usize>,
    pub preview: Preview,
}

pub struct NavState {
    working_dir: PathBuf,
    entries: Vec<DirEntry>,
    selection: Option<PathBuf>,
    history: DirHistory,
    options: ListOptions,
}

impl NavState {
    /// Opens `dir` and highlights its first entry.
    pub fn new(dir: PathBuf, options: ListOptions) -> Self {
        let entries = list_dir(&dir, &options);
        let selection = entries.first().map(|e| e.path().to_path_buf());
        Self {
            working_dir: dir,
            entries,
            selection,
            history: DirHistory::new(),
            options,
        }
    }

    // Getters / Accessors

    #[inline]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    #[inline]
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    #[inline]
    pub fn selection(&self) -> Option<&Path> {
        self.selection.as_deref()
    }

    #[inline]
    pub fn history(&self) -> &DirHistory {
        &self.history
    }

    #[inline]
    pub fn history_mut(&mut self) -> &mut DirHistory {
        &mut self.history
    }

    #[inline]
    pub fn options(&self) -> ListOptions {
        self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selection = self.selection.as_deref()?;
        self.entries.iter().position(|e| e.path() == selection)
    }

    pub fn selected_entry(&self) -> Option<&DirEntry> {
        self.selected_index().map(|idx| &self.entries[idx])
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(DirEntry::path)
    }

    /// Replaces the listing options and refreshes.
    pub fn set_options(&mut self, options: ListOptions) {
        self.options = options;
        self.refresh();
    }

    // Navigation functions

    /// Highlights `entries[idx]` and records it in the history.
    fn commit(&mut self, idx: usize) -> bool {
        let Some(entry) = self.entries.get(idx) else {
            return false;
        };
        let path = entry.path().to_path_buf();
        self.history.record(&path);
        tracing::debug!(selection = %path.display(), "selection changed");
        self.selection = Some(path);
        true
    }

    fn last_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    /// Moves the selection `n` entries up, clamped to the first entry.
    pub fn go_up(&mut self, n: usize) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let idx = self.selected_index().unwrap_or(0).saturating_sub(n);
        self.commit(idx)
    }

    /// Moves the selection `n` entries down, clamped to the last entry.
    pub fn go_down(&mut self, n: usize) -> bool {
        let Some(last) = self.last_index() else {
            return false;
        };
        let idx = match self.selected_index() {
            Some(idx) => idx.saturating_add(n).min(last),
            None => 0,
        };
        self.commit(idx)
    }

    pub fn go_top(&mut self) -> bool {
        self.commit(0)
    }

    pub fn go_bottom(&mut self) -> bool {
        match self.last_index() {
            Some(last) => self.commit(last),
            None => false,
        }
    }

    pub fn go_middle(&mut self) -> bool {
        match self.last_index() {
            Some(last) => self.commit(last / 2),
            None => false,
        }
    }

    /// Moves to the parent directory and highlights the directory just left.
    ///
    /// The selection of the directory being left is recorded, nothing is recorded for the
    /// parent. A no-op at the root.
    pub fn go_left(&mut self) -> bool {
        let Some(parent) = self.working_dir.parent().map(Path::to_path_buf) else {
            return false;
        };
        if parent == self.working_dir {
            return false;
        }

        if let Some(selection) = self.selection.as_deref() {
            self.history.record(selection);
        }

        let left = std::mem::replace(&mut self.working_dir, parent);
        self.entries = list_dir(&self.working_dir, &self.options);
        self.selection = Some(left);
        tracing::debug!(dir = %self.working_dir.display(), "go left");
        true
    }

    /// Enters the selected directory, or reports a file to open.
    pub fn go_right(&mut self) -> GoRight {
        let Some(entry) = self.selected_entry() else {
            return GoRight::Nothing;
        };
        let target = entry.path().to_path_buf();
        if !entry.is_dir() {
            return GoRight::Open(target);
        }

        let mut entries = match read_entries(&target) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(error = %e, "go right refused");
                return GoRight::Unreadable(target);
            }
        };
        self.options.filter_entries(&mut entries);

        let restored = self
            .history
            .lookup(&target)
            .and_then(|remembered| entries.iter().position(|e| e.path() == remembered))
            .unwrap_or(0);

        self.working_dir = target;
        self.entries = entries;
        self.selection = None;
        tracing::debug!(dir = %self.working_dir.display(), "go right");
        self.commit(restored);
        GoRight::Entered
    }

    /// Highlights the first entry whose name contains `query`, ignoring case.
    pub fn search(&mut self, query: &str) -> bool {
        let query = query.to_lowercase();
        if query.is_empty() {
            return false;
        }
        match self
            .entries
            .iter()
            .position(|e| e.name_str().to_lowercase().contains(&query))
        {
            Some(idx) => self.commit(idx),
            None => false,
        }
    }

    /// Highlights `path` if it is part of the current listing.
    pub fn select_path(&mut self, path: &Path) -> bool {
        match self.entries.iter().position(|e| e.path() == path) {
            Some(idx) => self.commit(idx),
            None => false,
        }
    }

    /// Re-reads the working directory and repairs the selection.
    ///
    /// A selection that disappeared is replaced by the entry now at the same index. If the
    /// working directory itself disappeared, the nearest existing ancestor is opened.
    pub fn refresh(&mut self) {
        let old_idx = self.selected_index();

        if !self.working_dir.is_dir() {
            let vanished = self.working_dir.clone();
            let ancestor = vanished
                .ancestors()
                .skip(1)
                .find(|p| p.is_dir())
                .map(Path::to_path_buf);

            if let Some(ancestor) = ancestor {
                tracing::debug!(
                    from = %vanished.display(),
                    to = %ancestor.display(),
                    "working directory vanished"
                );
                self.entries = list_dir(&ancestor, &self.options);
                self.selection = self
                    .history
                    .lookup(&ancestor)
                    .filter(|p| self.entries.iter().any(|e| e.path() == *p))
                    .map(Path::to_path_buf)
                    .or_else(|| self.entries.first().map(|e| e.path().to_path_buf()));
                self.working_dir = ancestor;
                return;
            }
        }

        self.entries = list_dir(&self.working_dir, &self.options);
        if self.selected_index().is_some() {
            return;
        }

        self.selection = self.last_index().map(|last| {
            let idx = old_idx.unwrap_or(0).min(last);
            self.entries[idx].path().to_path_buf()
        });
    }

    /// Reads the parent, current and preview panes.
    pub fn current_panes(&self) -> Panes<'_> {
        let (parent, parent_selected) = match self.working_dir.parent() {
            Some(parent) if parent != self.working_dir => {
                let entries = list_dir(parent, &self.options);
                let idx = entries.iter().position(|e| e.path() == self.working_dir);
                (entries, idx)
            }
            _ => (Vec::new(), None),
        };

        let preview = match self.selected_entry() {
            Some(entry) if entry.is_dir() => {
                let entries = list_dir(entry.path(), &self.options);
                let selected = self
                    .history
                    .lookup(entry.path())
                    .and_then(|p| entries.iter().position(|e| e.path() == p));
                Preview::Directory { entries, selected }
            }
            Some(entry) => FileInfo::get_file_info(entry.path())
                .map(Preview::File)
                .unwrap_or(Preview::Empty),
            None => Preview::Empty,
        };

        Panes {
            parent,
            parent_selected,
            current: &self.entries,
            current_selected: self.selected_index(),
            preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::rng;
    use rand::seq::SliceRandom;
    use std::error;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn sandbox(names: &[&str]) -> Result<tempfile::TempDir, Box<dyn error::Error>> {
        let dir = tempdir()?;
        for name in names {
            File::create(dir.path().join(name))?;
        }
        Ok(dir)
    }

    #[test]
    fn test_navstate_clamped_stress() -> Result<(), Box<dyn error::Error>> {
        let file_count = 10;
        let mut names: Vec<String> = (0..file_count).map(|i| format!("file_{i:02}.txt")).collect();
        names.shuffle(&mut rng());
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dir = sandbox(&refs)?;

        let mut nav = NavState::new(dir.path().to_path_buf(), ListOptions::default());
        assert_eq!(nav.entries().len(), file_count);
        assert_eq!(nav.selected_index(), Some(0));

        let mut rng = rng();
        let mut expected = 0usize;
        for _ in 0..1000 {
            let n = rng.random_range(0..15);
            if rng.random_bool(0.5) {
                nav.go_down(n);
                expected = (expected + n).min(file_count - 1);
            } else {
                nav.go_up(n);
                expected = expected.saturating_sub(n);
            }
            assert_eq!(nav.selected_index(), Some(expected));
        }

        for _ in 0..50 {
            nav.go_down(1);
        }
        assert_eq!(nav.selected_index(), Some(file_count - 1));
        for _ in 0..50 {
            nav.go_up(1);
        }
        assert_eq!(nav.selected_index(), Some(0));
        Ok(())
    }

    #[test]
    fn test_navstate_top_bottom_middle() -> Result<(), Box<dyn error::Error>> {
        let dir = sandbox(&["a", "b", "c", "d", "e"])?;
        let mut nav = NavState::new(dir.path().to_path_buf(), ListOptions::default());

        assert!(nav.go_bottom());
        assert_eq!(nav.selected_index(), Some(4));
        assert!(nav.go_middle());
        assert_eq!(nav.selected_index(), Some(2));
        assert!(nav.go_top());
        assert_eq!(nav.selected_index(), Some(0));
        Ok(())
    }

    #[test]
    fn test_navstate_empty_listing() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let mut nav = NavState::new(dir.path().to_path_buf(), ListOptions::default());

        assert!(nav.selection().is_none());
        assert!(!nav.go_down(1));
        assert!(!nav.go_up(1));
        assert!(!nav.go_top());
        assert!(!nav.go_bottom());
        assert_eq!(nav.go_right(), GoRight::Nothing);
        assert!(matches!(nav.current_panes().preview, Preview::Empty));
        Ok(())
    }

    #[test]
    fn test_navstate_round_trip() -> Result<(), Box<dyn error::Error>> {
        let base = tempdir()?;
        let sub = base.path().join("subdir");
        fs::create_dir(&sub)?;
        for name in ["a.txt", "b.txt", "c.txt"] {
            File::create(sub.join(name))?;
        }

        let mut nav = NavState::new(base.path().to_path_buf(), ListOptions::default());
        assert_eq!(nav.go_right(), GoRight::Entered);
        assert_eq!(nav.working_dir(), sub);
        assert!(nav.go_down(2));
        assert_eq!(nav.selection(), Some(sub.join("c.txt").as_path()));

        assert!(nav.go_left());
        assert_eq!(nav.working_dir(), base.path());
        assert_eq!(nav.selection(), Some(sub.as_path()));

        assert_eq!(nav.go_right(), GoRight::Entered);
        assert_eq!(nav.selection(), Some(sub.join("c.txt").as_path()));
        Ok(())
    }

    #[test]
    fn test_navstate_history_isolation() -> Result<(), Box<dyn error::Error>> {
        let base = tempdir()?;
        let a = base.path().join("a");
        let b = base.path().join("b");
        fs::create_dir(&a)?;
        fs::create_dir(&b)?;
        for name in ["x", "y"] {
            File::create(a.join(name))?;
        }
        for name in ["p", "q", "r"] {
            File::create(b.join(name))?;
        }

        let mut nav = NavState::new(base.path().to_path_buf(), ListOptions::default());

        // Remember "r" in b.
        assert!(nav.select_path(&b));
        nav.go_right();
        nav.go_bottom();
        nav.go_left();

        // Pick "y" in a.
        assert!(nav.select_path(&a));
        nav.go_right();
        assert!(nav.search("Y"));
        nav.go_left();

        assert_eq!(nav.history().lookup(&b), Some(b.join("r").as_path()));
        assert_eq!(nav.history().lookup(&a), Some(a.join("y").as_path()));

        nav.go_right();
        assert_eq!(nav.selection(), Some(a.join("y").as_path()));
        Ok(())
    }

    #[test]
    fn test_navstate_left_does_not_record_parent() -> Result<(), Box<dyn error::Error>> {
        let base = tempdir()?;
        let start = base.path().join("start");
        fs::create_dir(&start)?;
        File::create(start.join("inside.txt"))?;

        let mut nav = NavState::new(start.clone(), ListOptions::default());
        nav.go_down(1);
        assert!(nav.go_left());

        assert_eq!(nav.selection(), Some(start.as_path()));
        assert_eq!(nav.history().lookup(base.path()), None);
        assert_eq!(
            nav.history().lookup(&start),
            Some(start.join("inside.txt").as_path())
        );
        Ok(())
    }

    #[test]
    fn test_navstate_root_left_is_noop() {
        let root = PathBuf::from("/");
        let mut nav = NavState::new(root.clone(), ListOptions::default());
        let before = nav.selection().map(Path::to_path_buf);

        assert!(!nav.go_left());
        assert_eq!(nav.working_dir(), root);
        assert_eq!(nav.selection().map(Path::to_path_buf), before);
        assert!(nav.current_panes().parent.is_empty());
    }

    #[test]
    fn test_navstate_go_right_on_file_opens() -> Result<(), Box<dyn error::Error>> {
        let dir = sandbox(&["notes.md"])?;
        let mut nav = NavState::new(dir.path().to_path_buf(), ListOptions::default());

        assert_eq!(
            nav.go_right(),
            GoRight::Open(dir.path().join("notes.md"))
        );
        assert_eq!(nav.working_dir(), dir.path());
        Ok(())
    }

    #[test]
    fn test_navstate_search_not_found_keeps_selection() -> Result<(), Box<dyn error::Error>> {
        let dir = sandbox(&["alpha", "beta", "gamma"])?;
        let mut nav = NavState::new(dir.path().to_path_buf(), ListOptions::default());
        nav.go_bottom();

        assert!(!nav.search("zeta"));
        assert!(!nav.search(""));
        assert_eq!(nav.selected_index(), Some(2));

        assert!(nav.search("ET"));
        assert_eq!(nav.selection(), Some(dir.path().join("beta").as_path()));
        Ok(())
    }

    #[test]
    fn test_navstate_refresh_repairs_selection() -> Result<(), Box<dyn error::Error>> {
        let dir = sandbox(&["a", "b", "c"])?;
        let mut nav = NavState::new(dir.path().to_path_buf(), ListOptions::default());
        nav.go_down(1);

        fs::remove_file(dir.path().join("b"))?;
        nav.refresh();
        assert_eq!(nav.selection(), Some(dir.path().join("c").as_path()));

        fs::remove_file(dir.path().join("c"))?;
        nav.refresh();
        assert_eq!(nav.selection(), Some(dir.path().join("a").as_path()));

        fs::remove_file(dir.path().join("a"))?;
        nav.refresh();
        assert!(nav.selection().is_none());
        Ok(())
    }

    #[test]
    fn test_navstate_refresh_walks_up_from_vanished_dir() -> Result<(), Box<dyn error::Error>> {
        let base = tempdir()?;
        let deep = base.path().join("one/two");
        fs::create_dir_all(&deep)?;

        let mut nav = NavState::new(deep.clone(), ListOptions::default());
        fs::remove_dir_all(base.path().join("one"))?;
        nav.refresh();

        assert_eq!(nav.working_dir(), base.path());
        Ok(())
    }

    #[test]
    fn test_navstate_panes() -> Result<(), Box<dyn error::Error>> {
        let base = tempdir()?;
        let root = base.path().join("root");
        let sub = root.join("sub");
        fs::create_dir_all(&sub)?;
        File::create(sub.join("inner.txt"))?;
        fs::write(root.join("file.txt"), "hello")?;

        let mut nav = NavState::new(root.clone(), ListOptions::default());
        {
            let panes = nav.current_panes();
            assert_eq!(panes.current.len(), 2);
            assert_eq!(panes.current_selected, Some(0));
            assert_eq!(panes.parent.len(), 1);
            assert_eq!(panes.parent_selected, Some(0));
            match panes.preview {
                Preview::Directory { entries, .. } => assert_eq!(entries.len(), 1),
                other => return Err(format!("unexpected preview {other:?}").into()),
            }
        }

        nav.go_down(1);
        match nav.current_panes().preview {
            Preview::File(info) => assert_eq!(info.size(), 5),
            other => return Err(format!("unexpected preview {other:?}").into()),
        }
        Ok(())
    }
}
