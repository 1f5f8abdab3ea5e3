//! TUI rendering for the phonebook using ratatui.

mod input;
mod theme;

pub use input::{InputPump, handle_events, handle_key};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap,
    },
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use phonebook_engine::{App, DraftInput, Focus, LoadState, ModalRequest, sanitize_display_text};

const FORM_LABEL_WIDTH: u16 = 8; // "number: "
const MODAL_MAX_WIDTH: u16 = 64;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Notification
            Constraint::Length(1), // Error
            Constraint::Length(3), // Filter
            Constraint::Length(4), // Add form
            Constraint::Min(3),    // Numbers
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_title(frame, app, chunks[0], &palette);
    draw_message(
        frame,
        app.session().notification(),
        chunks[1],
        styles::notification(&palette),
        glyphs.notification,
    );
    draw_message(
        frame,
        app.session().error(),
        chunks[2],
        styles::error(&palette),
        glyphs.error,
    );
    draw_filter(frame, app, chunks[3], &palette);
    draw_form(frame, app, chunks[4], &palette);
    draw_numbers(frame, app, chunks[5], &palette, &glyphs);
    draw_key_hints(frame, app, chunks[6], &palette, &glyphs);

    if let Some(modal) = app.active_modal() {
        draw_modal(frame, modal, &palette, &glyphs);
    }
}

fn draw_title(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let title = Paragraph::new(Line::from(Span::styled("Phonebook", styles::title(palette))));
    frame.render_widget(title, area);

    let source = Paragraph::new(Line::from(Span::styled(
        sanitize_display_text(app.base_url()).into_owned(),
        Style::default().fg(palette.text_muted),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(source, area);
}

fn draw_message(frame: &mut Frame, text: Option<&str>, area: Rect, style: Style, marker: &str) {
    let Some(text) = text else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(format!("{marker} "), style),
        Span::styled(sanitize_display_text(text).into_owned(), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_filter(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let focused = app.focus() == Focus::Filter;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette, focused))
        .title(Span::styled(
            Focus::Filter.label(),
            Style::default().fg(palette.text_secondary),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let filter = app.session().filter();
    let (visible, cursor_x) = scroll_to_cursor(filter, inner.width);
    frame.render_widget(
        Paragraph::new(Span::styled(visible, Style::default().fg(palette.text_primary))),
        inner,
    );
    if focused {
        frame.set_cursor_position((inner.x.saturating_add(cursor_x), inner.y));
    }
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let focused = matches!(app.focus(), Focus::Name | Focus::Number);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette, focused))
        .title(Span::styled(
            "add a new",
            Style::default().fg(palette.text_secondary),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let fields = [
        (Focus::Name, app.session().draft_name()),
        (Focus::Number, app.session().draft_number()),
    ];
    for ((focus, draft), row) in fields.into_iter().zip(rows.iter()) {
        let is_focused = app.focus() == focus;
        let label_style = if is_focused {
            styles::key_highlight(palette)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        let width = row.width.saturating_sub(FORM_LABEL_WIDTH);
        let (visible, cursor_x) = scroll_to_cursor(draft, width);
        let line = Line::from(vec![
            Span::styled(
                format!(
                    "{:<width$}",
                    format!("{}:", focus.label()),
                    width = usize::from(FORM_LABEL_WIDTH)
                ),
                label_style,
            ),
            Span::styled(visible, Style::default().fg(palette.text_primary)),
        ]);
        frame.render_widget(Paragraph::new(line), *row);

        if is_focused {
            let x = row
                .x
                .saturating_add(FORM_LABEL_WIDTH)
                .saturating_add(cursor_x);
            frame.set_cursor_position((x, row.y));
        }
    }
}

fn draw_numbers(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let focused = app.focus() == Focus::List;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette, focused))
        .title(Span::styled(
            "Numbers",
            Style::default().fg(palette.text_secondary),
        ))
        .padding(Padding::horizontal(1));

    let session = app.session();
    let contacts = session.visible_contacts();

    if contacts.is_empty() {
        let (text, style) = match session.load_state() {
            LoadState::Loading => (
                format!("{} Loading contacts...", glyphs.pending),
                Style::default().fg(palette.warning),
            ),
            LoadState::Failed(reason) => (
                format!("{}  (press r to reload)", sanitize_display_text(reason)),
                Style::default().fg(palette.error),
            ),
            LoadState::Loaded if session.contacts().is_empty() => (
                "No contacts yet".to_string(),
                Style::default().fg(palette.text_muted),
            ),
            LoadState::Loaded => (
                "No matching contacts".to_string(),
                Style::default().fg(palette.text_muted),
            ),
        };
        let empty = Paragraph::new(Span::styled(text, style))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let selected = app.selected_index();
    let marker_width = glyphs.selected.width();
    let items: Vec<ListItem> = contacts
        .iter()
        .enumerate()
        .map(|(i, contact)| {
            let marker = if focused && Some(i) == selected {
                glyphs.selected.to_string()
            } else {
                " ".repeat(marker_width)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} "), styles::key_highlight(palette)),
                Span::styled(
                    sanitize_display_text(&contact.name).into_owned(),
                    Style::default().fg(palette.text_primary),
                ),
                Span::raw(" "),
                Span::styled(
                    sanitize_display_text(&contact.number).into_owned(),
                    Style::default().fg(palette.text_secondary),
                ),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(block);
    if focused {
        list = list.highlight_style(styles::selected_row(palette));
    }
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_key_hints(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let hints: Vec<(&str, &str)> = if app.active_modal().is_some() {
        Vec::new()
    } else {
        match app.focus() {
            Focus::List => vec![
                ("Tab", "focus"),
                (glyphs.arrows, "select"),
                ("d", "delete"),
                ("r", "reload"),
                ("q", "quit"),
            ],
            Focus::Filter => vec![("Tab", "focus"), ("Enter", "list"), ("Ctrl-C", "quit")],
            Focus::Name | Focus::Number => vec![
                ("Tab", "focus"),
                ("Enter", "add"),
                ("Esc", "list"),
                ("Ctrl-C", "quit"),
            ],
        }
    };

    let mut spans = Vec::new();
    for (i, (key, action)) in hints.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                format!(" {} ", glyphs.separator),
                styles::key_hint(palette),
            ));
        }
        spans.push(Span::styled(key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}"), styles::key_hint(palette)));
    }

    let pending = app.pending_requests();
    if pending > 0 {
        spans.push(Span::styled(
            format!("  {} {pending} pending", glyphs.pending),
            Style::default().fg(palette.warning),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_modal(frame: &mut Frame, modal: &ModalRequest, palette: &Palette, glyphs: &Glyphs) {
    let text = sanitize_display_text(modal.text()).into_owned();
    let (border_color, hint_line) = if modal.is_confirm() {
        (
            palette.accent,
            Line::from(vec![
                Span::styled("y/Enter", styles::key_highlight(palette)),
                Span::styled(" yes  ", styles::key_hint(palette)),
                Span::styled("n/Esc", styles::key_highlight(palette)),
                Span::styled(" no", styles::key_hint(palette)),
            ]),
        )
    } else {
        (
            palette.error,
            Line::from(vec![
                Span::styled("Enter", styles::key_highlight(palette)),
                Span::styled(" dismiss", styles::key_hint(palette)),
            ]),
        )
    };
    let title = if modal.is_confirm() {
        format!(" {} Confirm ", glyphs.question)
    } else {
        format!(" {} Alert ", glyphs.error)
    };

    let screen = frame.area();
    let max_width = MODAL_MAX_WIDTH.min(screen.width.saturating_sub(4)).max(10);
    let content_width = (text.width() as u16)
        .max(hint_line.width() as u16)
        .min(max_width.saturating_sub(4));
    let width = content_width.saturating_add(4);
    let text_rows = (text.width() as u16).div_ceil(content_width.max(1)).max(1);
    let height = text_rows.saturating_add(5).min(screen.height);

    let rect = Rect {
        x: screen.x + (screen.width.saturating_sub(width) / 2),
        y: screen.y + (screen.height.saturating_sub(height) / 2),
        width: width.min(screen.width),
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(palette.bg_panel))
        .title(Span::styled(title, Style::default().fg(border_color)))
        .padding(Padding::horizontal(1));

    let body = Paragraph::new(vec![
        Line::from(Span::styled(text, Style::default().fg(palette.text_primary))),
        Line::from(""),
        hint_line,
    ])
    .wrap(Wrap { trim: true })
    .block(block);

    frame.render_widget(Clear, rect);
    frame.render_widget(body, rect);
}

/// Visible slice of an input and the caret column within it, scrolled so the
/// caret stays inside `width` columns.
fn scroll_to_cursor(input: &DraftInput, width: u16) -> (String, u16) {
    let text = input.text();
    let caret = input.text_before_cursor().width();
    let width = usize::from(width.max(1));

    if caret < width {
        return (text.to_string(), caret as u16);
    }

    let scroll_target = caret - width + 1;
    let mut skipped = 0;
    let mut byte_offset = text.len();
    for (idx, grapheme) in text.grapheme_indices(true) {
        if skipped >= scroll_target {
            byte_offset = idx;
            break;
        }
        skipped += grapheme.width();
    }
    (text[byte_offset..].to_string(), (caret - skipped) as u16)
}
