//! Action context and input mode logic for fen.
//!
//! Contains the [ActionContext] struct, tracking the current prompt, the input buffer and
//! the [Selection] (marked paths plus the staged yank), and the file actions built on them:
//! yank/cut, paste, delete, rename and create.
//!
//! Paste and delete only plan and enqueue [FileOpRequest]s; the work happens on the
//! [FileOps] pool. Rename and create are quick single syscalls and run in place.

use crate::app::nav::NavState;
use crate::app::selection::{Selection, Yank, YankMode};
use crate::core::{Error, FileOpRequest, FileOps, Result};
use crate::utils::{path_exists, unique_path, validate_name};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Describes the current mode for action handling/input.
///
/// Variants:
/// * `Normal` - Default browsing mode.
/// * `Input` - Text prompt with a specific [InputMode].
/// * `ConfirmDelete` - y/n prompt before deleting `targets`.
/// * `ConfirmQuit` - y/n prompt shown when quitting with file operations in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionMode {
    Normal,
    Input { mode: InputMode, prompt: String },
    ConfirmDelete { targets: Vec<PathBuf>, prompt: String },
    ConfirmQuit { in_flight: usize },
}

/// Enumerates all the available text prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Rename,
    NewFile,
    NewFolder,
    OpenWith,
    Search,
}

/// Tracks current user action and input buffer state for file operations and commands.
///
/// # Fields
/// * `mode` - Current [ActionMode].
/// * `input_buffer` - Current input string buffer.
/// * `input_cursor_pos` - Cursor position within the input buffer, in bytes.
/// * `selection` - Marked paths and the staged yank.
#[derive(Debug)]
pub struct ActionContext {
    mode: ActionMode,
    input_buffer: String,
    input_cursor_pos: usize,
    selection: Selection,
}

impl ActionContext {
    // Getters / accessors

    #[inline]
    pub fn mode(&self) -> &ActionMode {
        &self.mode
    }

    #[inline]
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    #[inline]
    pub fn input_cursor_pos(&self) -> usize {
        self.input_cursor_pos
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    // Mode functions

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, ActionMode::Input { .. })
    }

    pub fn is_confirm_mode(&self) -> bool {
        matches!(
            self.mode,
            ActionMode::ConfirmDelete { .. } | ActionMode::ConfirmQuit { .. }
        )
    }

    pub fn enter_mode(&mut self, mode: ActionMode, initial_value: String) {
        self.mode = mode;
        self.input_buffer = initial_value;
        self.input_cursor_pos = self.input_buffer.len();
    }

    pub fn exit_mode(&mut self) {
        self.mode = ActionMode::Normal;
        self.input_buffer.clear();
        self.input_cursor_pos = 0;
    }

    // Actions functions

    /// Stages the marked files, or the highlighted one, for a later paste.
    pub fn action_yank(&mut self, nav: &NavState, mode: YankMode) -> Option<&'static str> {
        let staged = self.selection.stage(mode, nav.selection());
        if staged == 0 {
            return None;
        }
        Some(match mode {
            YankMode::Copy => "Yank!",
            YankMode::Move => "Cut!",
        })
    }

    /// Enqueues the staged yank into the working directory.
    ///
    /// Clears the yank and the selection. Returns the number of queued requests. If the engine
    /// refuses a request, the paths not queued yet stay yanked.
    pub fn action_paste(
        &mut self,
        nav: &NavState,
        ops: &FileOps,
        no_write: bool,
    ) -> Result<usize> {
        if no_write {
            return Err(Error::NoWriteMode("paste"));
        }
        let Some(yank) = self.selection.consume() else {
            return Ok(0);
        };

        let requests = plan_paste(&yank, nav.working_dir());
        self.selection.clear_selected();

        let count = requests.len();
        let mut pending = requests.into_iter();
        while let Some(request) = pending.next() {
            let src = request.source().to_path_buf();
            if let Err(e) = ops.enqueue(request) {
                let unqueued: Vec<PathBuf> = std::iter::once(src)
                    .chain(pending.by_ref().map(|r| r.source().to_path_buf()))
                    .collect();
                tracing::warn!(unqueued = unqueued.len(), error = %e, "paste interrupted");
                self.selection.restore(yank.mode(), unqueued);
                return Err(e);
            }
        }
        Ok(count)
    }

    /// Opens the delete confirmation for the marked files, or the highlighted one.
    pub fn prompt_delete(&mut self, nav: &NavState, no_write: bool) -> Result<bool> {
        if no_write {
            return Err(Error::NoWriteMode("delete"));
        }
        let targets = self.selection.targets(nav.selection());
        let prompt = match targets.as_slice() {
            [] => return Ok(false),
            [single] => format!(
                "Delete '{}'? [y/N]",
                single
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| single.display().to_string())
            ),
            many => format!("Delete {} selected files? [y/N]", many.len()),
        };

        self.enter_mode(ActionMode::ConfirmDelete { targets, prompt }, String::new());
        Ok(true)
    }

    /// Enqueues a delete for every confirmed target and clears the selection.
    pub fn action_delete(&mut self, targets: Vec<PathBuf>, ops: &FileOps) -> Result<usize> {
        self.selection.clear_selected();
        let count = targets.len();
        for path in targets {
            ops.enqueue(FileOpRequest::Delete { path })?;
        }
        Ok(count)
    }

    /// Renames the highlighted entry to the name in the input buffer.
    ///
    /// Rejected names and collisions leave the filesystem and the navigation state untouched.
    /// Returns the new path.
    pub fn action_rename(
        &mut self,
        nav: &mut NavState,
        no_write: bool,
    ) -> Result<Option<PathBuf>> {
        if no_write {
            return Err(Error::NoWriteMode("rename"));
        }
        let name = validate_name(&self.input_buffer)?;
        let Some(old) = nav.selection().map(Path::to_path_buf) else {
            return Ok(None);
        };

        let new = old.with_file_name(name);
        if new == old {
            return Ok(None);
        }
        if path_exists(&new) {
            return Err(Error::RenameCollision(new));
        }

        fs::rename(&old, &new).map_err(|e| Error::op("Rename", &old, e))?;
        tracing::info!(from = %old.display(), to = %new.display(), "renamed");

        self.selection.remove(&old);
        nav.history_mut().forget(&old);
        nav.refresh();
        nav.select_path(&new);
        Ok(Some(new))
    }

    /// Creates a file or directory named after the input buffer in the working directory.
    pub fn action_create(
        &mut self,
        nav: &mut NavState,
        is_dir: bool,
        no_write: bool,
    ) -> Result<PathBuf> {
        if no_write {
            return Err(Error::NoWriteMode("create"));
        }
        let name = validate_name(&self.input_buffer)?;
        let path = nav.working_dir().join(name);
        if path_exists(&path) {
            return Err(Error::CreateCollision(path));
        }

        let res = if is_dir {
            fs::create_dir(&path)
        } else {
            fs::File::create_new(&path).map(|_| ())
        };
        res.map_err(|e| Error::op("Create", &path, e))?;
        tracing::info!(path = %path.display(), is_dir, "created");

        nav.refresh();
        nav.select_path(&path);
        Ok(path)
    }

    // Cursor actions

    /// Moves the input cursor one character to the left, if possible.
    pub fn action_move_cursor_left(&mut self) {
        if let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_cursor_pos = previous;
        }
    }

    /// Moves the input cursor one character to the right, if possible.
    pub fn action_move_cursor_right(&mut self) {
        if let Some(ch) = self.input_buffer[self.input_cursor_pos..].chars().next() {
            self.input_cursor_pos += ch.len_utf8();
        }
    }

    /// Inserts a character at the current cursor position in the input buffer.
    pub fn action_insert_at_cursor(&mut self, ch: char) {
        self.input_buffer.insert(self.input_cursor_pos, ch);
        self.input_cursor_pos += ch.len_utf8();
    }

    /// Deletes the character before the current cursor position in the input buffer.
    ///
    /// Moves the cursor back accordingly
    pub fn action_backspace_at_cursor(&mut self) {
        if self.input_cursor_pos > 0
            && let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
                .char_indices()
                .next_back()
        {
            self.input_buffer.remove(previous);
            self.input_cursor_pos = previous;
        }
    }

    /// Deletes the character at the current cursor position in the input buffer.
    pub fn action_delete_at_cursor(&mut self) {
        if self.input_cursor_pos < self.input_buffer.len() {
            self.input_buffer.remove(self.input_cursor_pos);
        }
    }

    /// Moves the input cursor to the start of the input buffer.
    pub fn action_cursor_home(&mut self) {
        self.input_cursor_pos = 0;
    }

    /// Moves the input cursor to the end of the input buffer.
    pub fn action_cursor_end(&mut self) {
        self.input_cursor_pos = self.input_buffer.len();
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            mode: ActionMode::Normal,
            input_buffer: String::new(),
            input_cursor_pos: 0,
            selection: Selection::new(),
        }
    }
}

/// Turns a yank into one request per path, targeting `dest_dir`.
///
/// Destinations that exist, or that an earlier request of the same batch claimed, get a
/// ` (n)` suffix. A cut pasted back into its own directory becomes a move onto itself.
pub fn plan_paste(yank: &Yank, dest_dir: &Path) -> Vec<FileOpRequest> {
    let mut reserved: HashSet<PathBuf> = HashSet::new();
    let mut requests = Vec::with_capacity(yank.paths().len());

    for src in yank.paths() {
        let Some(name) = src.file_name() else {
            continue;
        };

        if yank.mode() == YankMode::Move && src.parent() == Some(dest_dir) {
            requests.push(FileOpRequest::Move {
                src: src.clone(),
                dest: src.clone(),
            });
            reserved.insert(src.clone());
            continue;
        }

        let dest = unique_path(&dest_dir.join(name), &reserved);
        reserved.insert(dest.clone());

        requests.push(match yank.mode() {
            YankMode::Copy => FileOpRequest::Copy {
                src: src.clone(),
                dest,
            },
            YankMode::Move => FileOpRequest::Move {
                src: src.clone(),
                dest,
            },
        });
    }
    requests
}
