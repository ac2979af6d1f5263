//! UI rendering functions for the TUI.
//!
//! Implements the layout with search bar, note list, detail view, status
//! line, and shortcut bar, plus the create-note modal overlay, using
//! ratatui widgets and layout management.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use time::format_description;

use super::app::{App, Focus};
use crate::form::{FormField, NoteForm, SubmitState};
use crate::models::Note;
use crate::store::QueryState;

/// Main rendering function for the TUI.
///
/// Draws the search bar, the list/detail panels, the pagination line, and
/// the shortcut bar. When the create-note modal is open it is rendered on
/// top of everything else.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Content area
            Constraint::Length(1), // Pagination/status line
            Constraint::Length(1), // Shortcut bar
        ])
        .split(size);

    // Split content area horizontally: note list (40%) | detail view (60%)
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[1]);

    render_search_bar(frame, app, main_chunks[0]);
    render_note_list(frame, app, content_chunks[0]);
    render_detail_view(frame, app, content_chunks[1]);
    render_status_line(frame, app, main_chunks[2]);
    render_shortcut_bar(frame, app, main_chunks[3]);

    if let Some(form) = app.form() {
        render_form_modal(frame, form, size);
    }
}

/// Renders the search bar at the top of the screen.
///
/// Shows the raw input buffer with a cursor indicator when focused.
fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::SearchInput && app.form().is_none();

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Search")
        .border_style(border_style);

    let mut content = app.search_input().to_string();
    if is_focused {
        content.push('█'); // Cursor indicator
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Renders the note list panel for the current query state.
///
/// `Loading` shows a placeholder, `Error` a terminal failure message, and
/// `Success` one line per note with tag and date.
fn render_note_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::NoteList && app.form().is_none();

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Notes ({})", app.tag()))
        .border_style(border_style);

    match app.view() {
        QueryState::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
        }
        QueryState::Error(_) => {
            let message = Paragraph::new("Failed to load notes")
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(message, area);
        }
        QueryState::Success(_) => {
            let items: Vec<ListItem> = app.notes().iter().map(note_list_item).collect();
            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::REVERSED),
            );

            let mut list_state = ListState::default();
            list_state.select(app.selected_index());
            frame.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

/// Builds one list line: truncated title, tag, and creation date.
fn note_list_item(note: &Note) -> ListItem<'_> {
    let preview: String = if note.title.chars().count() > 32 {
        let truncated: String = note.title.chars().take(32).collect();
        format!("{truncated}...")
    } else {
        note.title.clone()
    };

    let date_format = format_description::parse("[year]-[month]-[day]").expect("valid date format");
    let date_str = note
        .created_at
        .format(&date_format)
        .unwrap_or_else(|_| "????-??-??".to_string());

    let line = Line::from(vec![
        Span::raw(preview),
        Span::raw(" "),
        Span::styled(
            format!("[{} | {date_str}]", note.tag),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ]);

    ListItem::new(line)
}

/// Renders the detail view for the selected note.
///
/// Shows title, tag, timestamp, and the markdown-rendered content.
fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Detail");

    let content = if let Some(note) = app.selected_note() {
        let mut text = Text::default();

        text.lines.push(Line::from(vec![Span::styled(
            note.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )]));

        let date_format =
            format_description::parse("[year]-[month]-[day] [hour]:[minute]").expect("valid datetime format");
        text.lines.push(Line::from(vec![
            Span::styled(note.tag.as_str(), Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::styled(
                note.created_at
                    .format(&date_format)
                    .unwrap_or_else(|_| "????-??-?? ??:??".to_string()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        text.lines.push(Line::from(""));

        let body = tui_markdown::from_str(&note.content);
        for line in body.lines {
            text.lines.push(line);
        }

        text
    } else {
        Text::from("No note selected")
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Renders the pagination/status line.
///
/// The page indicator only appears when there is more than one page, and
/// the committed search term is echoed when present.
fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();

    if app.total_pages() > 1 {
        spans.push(Span::styled(
            format!("Page {}/{}", app.page(), app.total_pages()),
            Style::default().fg(Color::Cyan),
        ));
    }
    if !app.committed_search().is_empty() {
        if !spans.is_empty() {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("search: {}", app.committed_search()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the shortcut bar at the bottom of the screen.
///
/// Shows context-aware keyboard shortcuts based on the current focus.
/// Format: `Key: action | Key: action` with keys highlighted in cyan.
fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let mut spans = if app.form().is_some() {
        vec![
            Span::styled("Tab", key_style),
            Span::raw(": next field"),
            Span::styled(" | ", sep_style),
            Span::styled("Enter", key_style),
            Span::raw(": submit"),
            Span::styled(" | ", sep_style),
            Span::styled("Esc", key_style),
            Span::raw(": cancel"),
        ]
    } else {
        vec![
            Span::styled("Tab", key_style),
            Span::raw(": switch panel"),
            Span::styled(" | ", sep_style),
            Span::styled("n", key_style),
            Span::raw(": new note"),
            Span::styled(" | ", sep_style),
            Span::styled("q", key_style),
            Span::raw(": quit"),
        ]
    };

    if app.form().is_none() && app.focus() == Focus::NoteList {
        spans.push(Span::styled(" | ", sep_style));
        spans.push(Span::styled("j/k", key_style));
        spans.push(Span::raw(": navigate"));
        spans.push(Span::styled(" | ", sep_style));
        spans.push(Span::styled("h/l", key_style));
        spans.push(Span::raw(": page"));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the create-note modal centered over the given area.
fn render_form_modal(frame: &mut Frame, form: &NoteForm, area: Rect) {
    let modal = centered_rect(60, 20, area);
    frame.render_widget(Clear, modal);

    let block = Block::default().borders(Borders::ALL).title("Create note");
    frame.render_widget(block, modal);

    let inner = modal.inner(ratatui::layout::Margin {
        horizontal: 1,
        vertical: 1,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(1), // Title error
            Constraint::Min(4),    // Content
            Constraint::Length(1), // Content error
            Constraint::Length(3), // Tag
            Constraint::Length(1), // Tag error / submit status
        ])
        .split(inner);

    render_text_field(
        frame,
        chunks[0],
        "Title",
        form.title(),
        form.focus() == FormField::Title,
    );
    render_field_error(frame, chunks[1], form.error_for("title"));

    render_text_field(
        frame,
        chunks[2],
        "Content",
        form.content(),
        form.focus() == FormField::Content,
    );
    render_field_error(frame, chunks[3], form.error_for("content"));

    render_text_field(
        frame,
        chunks[4],
        "Tag",
        &format!("< {} >", form.tag()),
        form.focus() == FormField::Tag,
    );

    // The last line doubles as tag error and submission status
    if let Some(message) = form.error_for("tag") {
        render_field_error(frame, chunks[5], Some(message));
    } else {
        let status = match form.submit_state() {
            SubmitState::Idle => Line::from(""),
            SubmitState::Pending => Line::from(Span::styled(
                "Creating note...",
                Style::default().fg(Color::Yellow),
            )),
            SubmitState::Failed(message) => Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )),
        };
        frame.render_widget(Paragraph::new(status), chunks[5]);
    }
}

/// Renders one bordered input field with a focus indicator.
fn render_text_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(label.to_string())
        .border_style(border_style);

    let mut content = value.to_string();
    if focused {
        content.push('█');
    }

    frame.render_widget(
        Paragraph::new(content).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Renders a one-line field error in red, or nothing.
fn render_field_error(frame: &mut Frame, area: Rect, message: Option<&str>) {
    if let Some(message) = message {
        let line = Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Computes a centered rectangle of the given percentage width and fixed
/// height within `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
