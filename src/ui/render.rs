//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the terminal loop and the
//! layout helpers that split the screen into parent/main/preview chunks.
//!
//! This module should stay "pure rendering": it reads state and produces widgets,
//! without owning fen core logic.

use crate::app::AppState;
use crate::ui::panes::{self, PaneContext, PaneStyles};
use crate::ui::widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

/// Width ratio of the parent, main and preview panes.
const PANE_RATIOS: [u32; 3] = [1, 3, 3];

/// Render function which renders the entire terminal UI for fen on each frame.
pub fn render(frame: &mut Frame, app: &AppState) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    widgets::draw_header(frame, app, header);

    let [parent_area, main_area, preview_area] = layout_chunks(body);
    let panes = app.nav().current_panes();
    let styles = PaneStyles::default();
    let marks = app.actions().selection();

    panes::draw_listing(
        frame,
        PaneContext {
            area: parent_area,
            block: widgets::get_pane_block(""),
            styles: &styles,
            marks,
        },
        &panes.parent,
        panes.parent_selected,
    );

    panes::draw_listing(
        frame,
        PaneContext {
            area: main_area,
            block: widgets::get_pane_block(""),
            styles: &styles,
            marks,
        },
        panes.current,
        panes.current_selected,
    );

    panes::draw_preview(
        frame,
        PaneContext {
            area: preview_area,
            block: widgets::get_pane_block(""),
            styles: &styles,
            marks,
        },
        &panes.preview,
    );

    widgets::draw_footer(frame, app, footer);
    widgets::draw_overlays(frame, app);
}

/// Splits `size` into the parent, main and preview pane areas.
pub fn layout_chunks(size: Rect) -> [Rect; 3] {
    let total: u32 = PANE_RATIOS.iter().sum();
    Layout::horizontal(PANE_RATIOS.map(|r| Constraint::Ratio(r, total))).areas(size)
}
