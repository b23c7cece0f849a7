//! Application State and main controller module for fen.
//!
//! This module defines the overall [AppState] struct, which owns everything the UI thread
//! mutates and passes it to the render and terminal functions:
//! - Configuration (borrowed) and the keymap built from it
//! - [NavState] with the directory history
//! - [ActionContext] with the prompt state, the selection and the yank
//! - The [FileOps] engine and the [StatusSink] shared with its workers
//!
//! [AppState::tick] drains finished file operations and applies their consequences; the
//! workers themselves never touch navigation or selection state.

use crate::app::actions::{ActionContext, ActionMode};
use crate::app::keymap::{Action, Keymap};
use crate::app::nav::NavState;
use crate::config::Config;
use crate::core::{FileOpRequest, FileOps, StatusSink};

use crossterm::event::KeyEvent;

use std::path::Path;
use std::time::Duration;

/// How long a status message stays in the footer.
pub const STATUS_TTL: Duration = Duration::from_secs(5);

/// Enumeration for each individual keypress result processed.
///
/// Is used by the event loop to decide whether to keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypressResult {
    Continue,
    Consumed,
    /// Quit normally: no file operation is in flight.
    Quit,
    /// Quit confirmed while file operations were still running.
    ForceQuit,
    /// An external program ran in the terminal; the screen must be redrawn from scratch.
    OpenedEditor,
}

/// Main struct which holds the central Application state of fen
pub struct AppState<'a> {
    pub(super) config: &'a Config,
    pub(super) keymap: Keymap,

    pub(super) nav: NavState,
    pub(super) actions: ActionContext,

    pub(super) ops: FileOps,
    pub(super) status: StatusSink,

    pub(super) show_help: bool,
}

impl<'a> AppState<'a> {
    pub fn new(config: &'a Config) -> std::io::Result<Self> {
        let current_dir = std::env::current_dir()?;
        Self::from_dir(config, &current_dir)
    }

    pub fn from_dir(config: &'a Config, initial_path: &Path) -> std::io::Result<Self> {
        let status = StatusSink::new();
        let ops = FileOps::spawn(config.general().file_op_workers(), status.clone());
        Self::with_engine(config, initial_path, ops, status)
    }

    /// Builds the state around an existing engine and its status sink.
    pub(crate) fn with_engine(
        config: &'a Config,
        initial_path: &Path,
        ops: FileOps,
        status: StatusSink,
    ) -> std::io::Result<Self> {
        let current_dir = if initial_path.is_dir() {
            initial_path.to_path_buf()
        } else {
            std::env::current_dir()?
        };

        if !config.editor().exists() {
            tracing::debug!(editor = config.editor().cmd(), "configured editor not on PATH");
        }

        Ok(Self {
            config,
            keymap: Keymap::from_config(config),
            nav: NavState::new(current_dir, config.general().list_options()),
            actions: ActionContext::default(),
            ops,
            status,
            show_help: false,
        })
    }

    // Getters/ accessors

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    #[inline]
    pub fn actions(&self) -> &ActionContext {
        &self.actions
    }

    #[inline]
    pub fn ops(&self) -> &FileOps {
        &self.ops
    }

    #[inline]
    pub fn status(&self) -> &StatusSink {
        &self.status
    }

    #[inline]
    pub fn is_help_visible(&self) -> bool {
        self.show_help
    }

    /// Gives up the state and returns the engine, so the caller can drain it.
    pub fn into_engine(self) -> FileOps {
        self.ops
    }

    /// Updates state from the background and expires the status message.
    ///
    /// Returns true if anything visible changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = self.status.clear_expired(STATUS_TTL);

        let mut finished = 0usize;
        while let Ok(outcome) = self.ops.completions().try_recv() {
            finished += 1;
            if !outcome.is_ok() {
                continue;
            }
            match outcome.request() {
                FileOpRequest::Delete { path } => self.forget_path(path),
                FileOpRequest::Move { src, dest } if src != dest => self.forget_path(src),
                _ => {}
            }
        }

        if finished > 0 {
            tracing::debug!(finished, "file operations completed");
            self.nav.refresh();
            changed = true;
        }

        if let ActionMode::ConfirmQuit { in_flight } = self.actions.mode() {
            let now = self.ops.in_flight_count();
            if now != *in_flight {
                self.actions
                    .enter_mode(ActionMode::ConfirmQuit { in_flight: now }, String::new());
                changed = true;
            }
        }
        changed
    }

    /// A path is gone: drop it from the history, the selection and the yank.
    fn forget_path(&mut self, path: &Path) {
        self.nav.history_mut().forget(path);
        self.actions.selection_mut().remove(path);
    }

    /// Central key handler
    ///
    /// Coordinates the action and handler module functions.
    pub fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if self.actions.is_confirm_mode() {
            return self.handle_confirm_mode(key);
        }

        if self.actions.is_input_mode() {
            return self.handle_input_mode(key);
        }

        if self.show_help {
            return self.handle_help_mode(key);
        }

        if let Some(action) = self.keymap.lookup(key) {
            match action {
                Action::System(sys_act) => return self.handle_sys_action(sys_act),
                Action::Nav(nav_act) => return self.handle_nav_action(nav_act),
                Action::File(file_act) => return self.handle_file_action(file_act),
            }
        }

        KeypressResult::Continue
    }

    /// Quits right away when the engine is idle, otherwise asks for confirmation.
    pub fn request_quit(&mut self) -> KeypressResult {
        let in_flight = self.ops.in_flight_count();
        if in_flight == 0 {
            return KeypressResult::Quit;
        }

        tracing::debug!(in_flight, "quit requested with work in flight");
        self.actions
            .enter_mode(ActionMode::ConfirmQuit { in_flight }, String::new());
        KeypressResult::Consumed
    }
}
