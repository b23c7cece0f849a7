//! Widget drawers for fen: pane blocks, header and footer lines, prompts and confirm dialogs.

use crate::app::{ActionMode, AppState};
use crate::config::Keys;
use crate::core::{StatusKind, sanitize_to_exact_width};
use crate::utils::shorten_home_path;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn get_pane_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title.to_string())
}

/// Working directory with the home directory shortened to `~`.
pub fn draw_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let path = shorten_home_path(app.nav().working_dir());
    let mut spans = vec![Span::styled(
        path,
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(entry) = app.nav().selected_entry() {
        let sep = if app.nav().working_dir().parent().is_some() {
            std::path::MAIN_SEPARATOR_STR
        } else {
            ""
        };
        spans.push(Span::raw(format!("{sep}{}", entry.name_str())));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Status message on the left, position and counters on the right.
pub fn draw_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let right = footer_counters(app);
    let right_width = right.width() as u16;

    let [left_area, right_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)]).areas(area);

    if let Some(msg) = app.status().current() {
        let style = match msg.kind() {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        };
        let text = sanitize_to_exact_width(msg.text(), left_area.width as usize);
        frame.render_widget(Paragraph::new(Span::styled(text, style)), left_area);
    }

    frame.render_widget(
        Paragraph::new(right).alignment(Alignment::Right),
        right_area,
    );
}

/// Builds `N/M  S sel  Y yank  R running`, leaving out zero counters.
pub fn footer_counters(app: &AppState) -> String {
    let nav = app.nav();
    let total = nav.entries().len();
    let pos = nav.selected_index().map(|i| i + 1).unwrap_or(0);

    let mut parts = vec![format!("{pos}/{total}")];

    let selection = app.actions().selection();
    if selection.selected_count() > 0 {
        parts.push(format!("{} sel", selection.selected_count()));
    }
    if selection.yanked_count() > 0 {
        parts.push(format!("{} yank", selection.yanked_count()));
    }
    let running = app.ops().in_flight_count();
    if running > 0 {
        parts.push(format!("{running} running"));
    }
    parts.join("  ")
}

/// Draws the prompt or confirmation of the current [ActionMode], if any.
pub fn draw_overlays(frame: &mut Frame, app: &AppState) {
    if app.is_help_visible() {
        draw_keybind_help(frame, app);
    }

    match app.actions().mode() {
        ActionMode::Normal => {}
        ActionMode::Input { prompt, .. } => draw_input_dialog(frame, app, prompt),
        ActionMode::ConfirmDelete { prompt, .. } => {
            draw_confirm_popup(frame, " Confirm Delete ", prompt);
        }
        ActionMode::ConfirmQuit { in_flight } => {
            let prompt = format!(
                "{in_flight} file operations in progress. Quitting can corrupt your files!\n\nQuit anyway? [y/N]"
            );
            draw_confirm_popup(frame, " Quit ", &prompt);
        }
    }
}

fn draw_keybind_help(frame: &mut Frame, app: &AppState) {
    let lines = keybind_help_lines(app.config().keys());
    let height = (lines.len() as u16 + 2).min(frame.area().height);
    let area = centered(frame.area(), 70, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Keybindings ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One line per action with its configured keys, grouped in sections.
pub fn keybind_help_lines(keys: &Keys) -> Vec<Line<'static>> {
    let fmt_keys = |list: &[String]| -> String {
        if list.is_empty() {
            "-".to_string()
        } else {
            list.join(", ")
        }
    };

    let sections: [(&str, Vec<(&[String], &str)>); 3] = [
        (
            "Navigation",
            vec![
                (keys.go_up(), "Move up"),
                (keys.go_down(), "Move down"),
                (keys.go_parent(), "Go to parent directory"),
                (keys.go_into_dir(), "Enter directory / open file"),
                (keys.go_to_top(), "Go to top"),
                (keys.go_to_bottom(), "Go to bottom"),
                (keys.go_to_middle(), "Go to middle"),
                (keys.page_up(), "Page up"),
                (keys.page_down(), "Page down"),
                (keys.search(), "Search"),
                (keys.toggle_hidden(), "Toggle hidden files"),
            ],
        ),
        (
            "Selection & files",
            vec![
                (keys.toggle_marker(), "Mark entry"),
                (keys.select_all(), "Mark all"),
                (keys.clear_all(), "Clear marks and yank"),
                (keys.yank(), "Yank"),
                (keys.cut(), "Cut"),
                (keys.paste(), "Paste"),
                (keys.delete(), "Delete"),
                (keys.rename(), "Rename"),
                (keys.create(), "New file"),
                (keys.create_directory(), "New folder"),
                (keys.open_with(), "Open with"),
            ],
        ),
        (
            "System",
            vec![
                (keys.keybind_help(), "Toggle this help"),
                (keys.quit(), "Quit"),
            ],
        ),
    ];

    let header_style = Style::default().add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Blue);

    let mut lines = Vec::new();
    for (name, rows) in sections {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(format!("{name}:"), header_style)));
        for (list, desc) in rows {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<22}", fmt_keys(list)), key_style),
                Span::raw(desc.to_string()),
            ]));
        }
    }
    lines
}

fn draw_input_dialog(frame: &mut Frame, app: &AppState, prompt: &str) {
    let area = centered(frame.area(), 50, 3);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Blue))
        .title(format!(" {prompt} "));
    let visible_width = area.width.saturating_sub(2) as usize;

    let (display_input, cursor_offset) = input_field_view(
        app.actions().input_buffer(),
        app.actions().input_cursor_pos(),
        visible_width,
    );

    frame.render_widget(Paragraph::new(display_input).block(block), area);
    frame.set_cursor_position((area.x + 1 + cursor_offset as u16, area.y + 1));
}

pub fn draw_confirm_popup(frame: &mut Frame, title: &str, prompt: &str) {
    let area = centered(frame.area(), 50, 7);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Red));

    let text = Paragraph::new(format!("\n{}", prompt))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(text, area);
}

/// A `width`% wide, `height` rows tall rectangle in the middle of `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Percentage(width)])
        .flex(Flex::Center)
        .areas(row);
    rect
}

/// Helper function to calculate cursor offset for cursor moving
/// Handles horizontal truncation, variable width with unicode_width and clamps cursor to buffer.
fn input_field_view(input_text: &str, cursor_pos: usize, visible_width: usize) -> (&str, usize) {
    let cursor_pos = cursor_pos.min(input_text.len());
    if input_text.width() <= visible_width {
        return (input_text, input_text[..cursor_pos].width());
    }

    let mut current_w = 0;
    let mut start = input_text.len();
    for (idx, ch) in input_text.char_indices().rev() {
        current_w += ch.width().unwrap_or(0);
        if current_w > visible_width {
            start = idx + ch.len_utf8();
            break;
        }
    }

    let cursor_offset = if cursor_pos < start {
        0
    } else {
        input_text[start..cursor_pos].width()
    };
    (&input_text[start..], cursor_offset)
}
