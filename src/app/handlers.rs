//! Input action handler methods for fen.
//!
//! This module implements [AppState] methods that process key events, file/nav actions,
//! and the prompt modes (rename, create, search, open with and the y/n confirmations).

use crate::app::actions::{ActionMode, InputMode};
use crate::app::keymap::{Action, FileAction, NavAction, SystemAction};
use crate::app::nav::{GoRight, PAGE_STEP};
use crate::app::selection::YankMode;
use crate::app::state::{AppState, KeypressResult};
use crate::core::Error;
use crate::utils::open_path;

use crossterm::event::{KeyCode::*, KeyEvent};
use std::path::Path;

/// AppState input and action handlers
impl<'a> AppState<'a> {
    // AppState core handlers

    /// Handles key events when a text prompt is open.
    ///
    /// Enter submits the buffer for the current [InputMode], Esc cancels. Everything else
    /// edits the buffer.
    pub(super) fn handle_input_mode(&mut self, key: KeyEvent) -> KeypressResult {
        let mode = if let ActionMode::Input { mode, .. } = self.actions.mode() {
            *mode
        } else {
            return KeypressResult::Continue;
        };

        match key.code {
            Enter => {
                let result = match mode {
                    InputMode::NewFile => {
                        self.create_entry(false);
                        KeypressResult::Consumed
                    }
                    InputMode::NewFolder => {
                        self.create_entry(true);
                        KeypressResult::Consumed
                    }
                    InputMode::Rename => {
                        self.rename_entry();
                        KeypressResult::Consumed
                    }
                    InputMode::Search => {
                        self.search_entry();
                        KeypressResult::Consumed
                    }
                    InputMode::OpenWith => {
                        let program = self.actions.input_buffer().trim().to_string();
                        self.actions.exit_mode();
                        let program = (!program.is_empty()).then_some(program.as_str());
                        return self.open_selection(program);
                    }
                };
                self.actions.exit_mode();
                result
            }

            Esc => {
                self.actions.exit_mode();
                KeypressResult::Consumed
            }

            Left => {
                self.actions.action_move_cursor_left();
                KeypressResult::Consumed
            }

            Right => {
                self.actions.action_move_cursor_right();
                KeypressResult::Consumed
            }

            Home => {
                self.actions.action_cursor_home();
                KeypressResult::Consumed
            }

            End => {
                self.actions.action_cursor_end();
                KeypressResult::Consumed
            }

            Backspace => {
                self.actions.action_backspace_at_cursor();
                KeypressResult::Consumed
            }

            Delete => {
                self.actions.action_delete_at_cursor();
                KeypressResult::Consumed
            }

            Char(c) => {
                self.actions.action_insert_at_cursor(c);
                KeypressResult::Consumed
            }

            _ => KeypressResult::Consumed,
        }
    }

    /// Handles the y/n prompts. Anything but `y` cancels.
    pub(super) fn handle_confirm_mode(&mut self, key: KeyEvent) -> KeypressResult {
        let confirmed = matches!(key.code, Char('y') | Char('Y'));

        match self.actions.mode().clone() {
            ActionMode::ConfirmDelete { targets, .. } => {
                self.actions.exit_mode();
                if confirmed {
                    self.delete_targets(targets);
                }
                KeypressResult::Consumed
            }
            ActionMode::ConfirmQuit { in_flight } => {
                if confirmed {
                    tracing::warn!(in_flight, "force quit with file operations in progress");
                    return KeypressResult::ForceQuit;
                }
                self.actions.exit_mode();
                KeypressResult::Consumed
            }
            _ => KeypressResult::Continue,
        }
    }

    /// Handles the provided [NavAction] and returns a [KeypressResult].
    pub(super) fn handle_nav_action(&mut self, action: NavAction) -> KeypressResult {
        match action {
            NavAction::GoUp => {
                self.nav.go_up(1);
            }
            NavAction::GoDown => {
                self.nav.go_down(1);
            }
            NavAction::PageUp => {
                self.nav.go_up(PAGE_STEP);
            }
            NavAction::PageDown => {
                self.nav.go_down(PAGE_STEP);
            }
            NavAction::GoToTop => {
                self.nav.go_top();
            }
            NavAction::GoToBottom => {
                self.nav.go_bottom();
            }
            NavAction::GoToMiddle => {
                self.nav.go_middle();
            }
            NavAction::GoParent => {
                self.nav.go_left();
            }
            NavAction::GoIntoDir => return self.go_into(),

            NavAction::ToggleMarker => {
                if let Some(path) = self.nav.selection().map(Path::to_path_buf) {
                    self.actions.selection_mut().toggle(&path);
                    self.nav.go_down(1);
                }
            }
            NavAction::SelectAll => {
                let paths: Vec<_> = self.nav.paths().map(Path::to_path_buf).collect();
                self.actions.selection_mut().select_all(paths);
            }
            NavAction::ClearAll => {
                if self.actions.selection_mut().clear_all() {
                    self.status.info("Deselected and un-yanked!");
                }
            }

            NavAction::Search => self.prompt(InputMode::Search, "Search:", String::new()),
            NavAction::ToggleHidden => {
                let mut options = self.nav.options();
                options.show_hidden = !options.show_hidden;
                self.nav.set_options(options);
            }
        }
        KeypressResult::Consumed
    }

    /// Handles the provided [FileAction] and returns a [KeypressResult].
    pub(super) fn handle_file_action(&mut self, action: FileAction) -> KeypressResult {
        let no_write = self.config.general().no_write();

        match action {
            FileAction::Yank => self.stage(YankMode::Copy),
            FileAction::Cut => self.stage(YankMode::Move),
            FileAction::Paste => {
                match self.actions.action_paste(&self.nav, &self.ops, no_write) {
                    Ok(0) => self.status.info("Nothing to paste..."),
                    Ok(_) => self.status.info("Paste!"),
                    Err(e) => self.report(&e),
                }
            }
            FileAction::Delete => {
                if let Err(e) = self.actions.prompt_delete(&self.nav, no_write) {
                    self.report(&e);
                }
            }
            FileAction::Rename => {
                if no_write {
                    self.report(&Error::NoWriteMode("rename"));
                } else if let Some(entry) = self.nav.selected_entry() {
                    let name = entry.name_str().into_owned();
                    self.prompt(InputMode::Rename, "Rename:", name);
                }
            }
            FileAction::Create => {
                if no_write {
                    self.report(&Error::NoWriteMode("create"));
                } else {
                    self.prompt(InputMode::NewFile, "New file:", String::new());
                }
            }
            FileAction::CreateDirectory => {
                if no_write {
                    self.report(&Error::NoWriteMode("create"));
                } else {
                    self.prompt(InputMode::NewFolder, "New folder:", String::new());
                }
            }
            FileAction::OpenWith => {
                if self.nav.selected_entry().is_some_and(|e| !e.is_dir()) {
                    self.prompt(InputMode::OpenWith, "Open with:", String::new());
                }
            }
        }
        KeypressResult::Consumed
    }

    /// Handles the provided [SystemAction] and returns a [KeypressResult].
    pub(super) fn handle_sys_action(&mut self, action: SystemAction) -> KeypressResult {
        match action {
            SystemAction::Quit => self.request_quit(),
            SystemAction::KeybindHelp => {
                self.show_help = true;
                KeypressResult::Consumed
            }
        }
    }

    /// The help overlay swallows every key. Its own key, Esc or quit closes it.
    pub(super) fn handle_help_mode(&mut self, key: KeyEvent) -> KeypressResult {
        let closes = matches!(
            self.keymap.lookup(key),
            Some(Action::System(SystemAction::KeybindHelp | SystemAction::Quit))
        );
        if closes || key.code == Esc {
            self.show_help = false;
        }
        KeypressResult::Consumed
    }

    /// Opens the highlighted file with `program`, or the configured editor.
    pub fn open_selection(&mut self, program: Option<&str>) -> KeypressResult {
        let Some(entry) = self.nav.selected_entry() else {
            return KeypressResult::Continue;
        };
        if entry.is_dir() {
            return KeypressResult::Continue;
        }
        let path = entry.path().to_path_buf();

        match open_path(&path, program, self.config.editor()) {
            Ok(()) => {
                self.nav.refresh();
                KeypressResult::OpenedEditor
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "open failed");
                self.status.error(format!("Cannot open '{}': {e}", path.display()));
                KeypressResult::OpenedEditor
            }
        }
    }

    // Helpers

    fn go_into(&mut self) -> KeypressResult {
        match self.nav.go_right() {
            GoRight::Entered | GoRight::Nothing => KeypressResult::Consumed,
            GoRight::Open(_) => self.open_selection(None),
            GoRight::Unreadable(path) => {
                self.report(&Error::ListingUnavailable { path });
                KeypressResult::Consumed
            }
        }
    }

    fn prompt(&mut self, mode: InputMode, prompt: &str, initial: String) {
        self.actions.enter_mode(
            ActionMode::Input {
                mode,
                prompt: prompt.to_string(),
            },
            initial,
        );
    }

    fn stage(&mut self, mode: YankMode) {
        if let Some(msg) = self.actions.action_yank(&self.nav, mode) {
            self.status.info(msg);
        }
    }

    fn delete_targets(&mut self, targets: Vec<std::path::PathBuf>) {
        if let Err(e) = self.actions.action_delete(targets, &self.ops) {
            self.report(&e);
        }
    }

    fn rename_entry(&mut self) {
        let no_write = self.config.general().no_write();
        if let Err(e) = self.actions.action_rename(&mut self.nav, no_write) {
            self.report(&e);
        }
    }

    fn create_entry(&mut self, is_dir: bool) {
        let no_write = self.config.general().no_write();
        if let Err(e) = self.actions.action_create(&mut self.nav, is_dir, no_write) {
            self.report(&e);
        }
    }

    fn search_entry(&mut self) {
        let query = self.actions.input_buffer().to_string();
        if !self.nav.search(&query) {
            self.status.info("Nothing found");
        }
    }

    fn report(&self, err: &Error) {
        tracing::debug!(error = %err, "action failed");
        self.status.error(err.to_string());
    }
}
