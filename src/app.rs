//! Application state and logic for fen.
//!
//! Holds the navigation model, the selection and yank, the prompt modes and the key
//! handlers that tie them to the file operation engine.

pub mod actions;
pub mod handlers;
pub mod history;
pub mod keymap;
pub mod nav;
pub mod selection;
pub mod state;

pub use actions::{ActionContext, ActionMode, InputMode};
pub use keymap::{Action, Keymap};
pub use nav::{NavState, Panes, Preview};
pub use selection::{Selection, YankMode};
pub use state::{AppState, KeypressResult};
