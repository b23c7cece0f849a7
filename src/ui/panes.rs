//! UI pane drawing module for fen.
//!
//! This module provides the drawers for the parent, main and preview panes.
//! Highlighting of the cursor, marked and yanked entries and file kind coloring is handled here.
//!
//! Used internally by ui::render

use crate::app::{Preview, Selection};
use crate::core::{
    DirEntry, EntryKind, FileInfo, format_file_size, format_file_time, sanitize_to_exact_width,
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph},
};

/// Prefix for marked entries.
const MARKER: &str = "  ";

/// Styles used for rendering items in a pane
pub struct PaneStyles {
    pub item: Style,
    pub dir: Style,
    pub other: Style,
    pub cursor: Style,
    pub marked: Style,
    pub yanked: Style,
}

impl Default for PaneStyles {
    fn default() -> Self {
        Self {
            item: Style::default().fg(Color::White),
            dir: Style::default().fg(Color::Blue),
            other: Style::default().fg(Color::Gray),
            cursor: Style::default().fg(Color::Black).bg(Color::Gray),
            marked: Style::default().fg(Color::Yellow),
            yanked: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        }
    }
}

impl PaneStyles {
    /// Picks the entry style. The cursor style replaces the kind color; marks recolor the text
    /// and yanks dim it on top.
    pub fn get_style(&self, entry: &DirEntry, is_cursor: bool, marks: &Selection) -> Style {
        let mut style = if entry.is_dir() {
            self.dir
        } else if entry.kind() == EntryKind::File {
            self.item
        } else {
            self.other
        };

        if is_cursor {
            style = self.cursor;
        }
        if marks.is_selected(entry.path()) {
            style = style.fg(self.marked.fg.unwrap_or(Color::Yellow));
        }
        if marks.is_yanked(entry.path()) {
            style = style.patch(self.yanked);
        }
        style
    }
}

/// Context data for pane rendering functions
pub struct PaneContext<'a> {
    pub area: Rect,
    pub block: Block<'a>,
    pub styles: &'a PaneStyles,
    pub marks: &'a Selection,
}

/// Draws a directory listing with the cursor on `selected`.
///
/// An empty listing renders a red `empty` placeholder.
pub fn draw_listing(
    frame: &mut Frame,
    context: PaneContext,
    entries: &[DirEntry],
    selected: Option<usize>,
) {
    if entries.is_empty() {
        let line = Line::from(Span::styled("empty", Style::default().fg(Color::Red)));
        frame.render_widget(Paragraph::new(line).block(context.block), context.area);
        return;
    }

    let inner_width = context.block.inner(context.area).width as usize;
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            make_entry_row(
                entry,
                Some(idx) == selected,
                inner_width,
                context.styles,
                context.marks,
            )
        })
        .collect();

    let mut state = ListState::default();
    state.select(selected);

    frame.render_stateful_widget(
        List::new(items)
            .block(context.block)
            .highlight_style(Style::default()),
        context.area,
        &mut state,
    );
}

/// Draws the right-hand pane: a child listing for directories, details for anything else.
pub fn draw_preview(frame: &mut Frame, context: PaneContext, preview: &Preview) {
    match preview {
        Preview::Directory { entries, selected } => {
            draw_listing(frame, context, entries, *selected);
        }
        Preview::File(info) => {
            let lines = file_info_lines(info);
            frame.render_widget(Paragraph::new(lines).block(context.block), context.area);
        }
        Preview::Empty => {
            frame.render_widget(Paragraph::new("").block(context.block), context.area);
        }
    }
}

/// Builds one row, truncated or padded to the pane width.
fn make_entry_row<'a>(
    entry: &DirEntry,
    is_cursor: bool,
    width: usize,
    styles: &PaneStyles,
    marks: &Selection,
) -> ListItem<'a> {
    let style = styles.get_style(entry, is_cursor, marks);
    let prefix = if marks.is_selected(entry.path()) {
        MARKER
    } else {
        ""
    };

    let name = format!("{prefix}{}", entry.name_str());
    let text = sanitize_to_exact_width(&name, width);
    ListItem::new(Line::from(Span::styled(text, style)))
}

/// Formats the detail block shown for files, symlinks and special entries.
pub fn file_info_lines(info: &FileInfo) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Blue);
    let row = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<10}"), label),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        row("Name", info.name().to_string_lossy().into_owned()),
        row("Type", info.kind().label().to_string()),
        row("Size", format_file_size(info.size())),
        row("Perms", info.attributes().to_string()),
        row("Modified", format_file_time(info.modified())),
    ];
    if let Some(target) = info.symlink_target() {
        lines.push(row("Target", target.display().to_string()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::YankMode;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn yanked_entries_are_dimmed_and_marks_colored() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let path = temp.path().join("a.txt");
        fs::write(&path, "x")?;
        let entry = DirEntry::from_path(&path)?;
        let styles = PaneStyles::default();

        let mut marks = Selection::new();
        assert_eq!(styles.get_style(&entry, false, &marks), styles.item);

        marks.toggle(&path);
        assert_eq!(styles.get_style(&entry, false, &marks).fg, Some(Color::Yellow));

        marks.stage(YankMode::Copy, None);
        let style = styles.get_style(&entry, false, &marks);
        assert!(style.add_modifier.contains(Modifier::DIM));
        Ok(())
    }

    #[test]
    fn file_info_shows_size_and_kind() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let path = temp.path().join("data.bin");
        fs::write(&path, vec![0u8; 2048])?;
        let info = FileInfo::get_file_info(&path)?;

        let text: Vec<String> = file_info_lines(&info)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.iter().any(|l| l.contains("data.bin")));
        assert!(text.iter().any(|l| l.contains("2.05 kB")));
        Ok(())
    }
}
