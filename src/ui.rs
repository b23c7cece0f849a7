//! Terminal UI for fen: the three-pane layout, header, footer and dialogs.

pub mod panes;
pub mod render;
pub mod widgets;

pub use render::render;
