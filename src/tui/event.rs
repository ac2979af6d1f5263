//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes. Key
//! behavior depends on whether the create-note modal is open and on which
//! panel has focus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};
use crate::form::FormField;

/// Handles a keyboard event and updates the app state accordingly.
///
/// Returns `true` if the application should quit, `false` otherwise.
///
/// # Event Handling
///
/// - `Ctrl+C`: quit from anywhere
/// - Modal open: keys edit the form (`Tab` cycles fields, `Enter`/`Ctrl+S`
///   submits, `Esc` closes)
/// - `Tab`/`Shift+Tab`: cycle focus between search bar and note list
/// - `Esc`: return to search input
/// - Search focused: character input feeds the debounced search buffer
/// - List focused: `j`/`k` select, `h`/`l` turn pages, `n` opens the
///   create modal, `r` refreshes, `q` quits
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    // Global quit, regardless of modal or focus
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if app.form().is_some() {
        handle_form_keys(app, key);
        return false;
    }

    match key.code {
        KeyCode::Tab => app.next_focus(),
        KeyCode::BackTab => app.next_focus(),
        KeyCode::Esc => {
            app.reset_focus();
            app.clear_selection();
        }
        _ => match app.focus() {
            Focus::SearchInput => handle_search_input(app, key),
            Focus::NoteList => return handle_note_list(app, key),
        },
    }

    false
}

/// Handles keyboard input when the search bar is focused.
///
/// Characters and backspace edit the buffer and re-arm the debouncer;
/// Enter commits the term immediately without waiting out the quiet
/// period.
fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_search_char(c);
        }
        KeyCode::Backspace => {
            app.pop_search_char();
        }
        KeyCode::Enter => {
            app.flush_search();
        }
        _ => {
            // Ignore other keys when in search input
        }
    }
}

/// Handles keyboard input when the note list is focused.
///
/// Returns `true` if the application should quit.
fn handle_note_list(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => return true,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_page(),
        KeyCode::Char('l') | KeyCode::Right => app.next_page(),
        KeyCode::Char('n') => app.open_form(),
        KeyCode::Char('r') => app.refresh(),
        _ => {
            // Ignore other keys when in note list
        }
    }
    false
}

/// Handles keyboard input while the create-note modal is open.
fn handle_form_keys(app: &mut App, key: KeyEvent) {
    // Submission shortcut works from any field
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.submit_form();
        return;
    }

    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab => {
            if let Some(form) = app.form_mut() {
                form.next_field();
            }
        }
        KeyCode::BackTab => {
            if let Some(form) = app.form_mut() {
                form.prev_field();
            }
        }
        KeyCode::Enter => {
            // Enter types a newline in the body and submits elsewhere
            let in_content = app
                .form()
                .is_some_and(|form| form.focus() == FormField::Content);
            if in_content {
                if let Some(form) = app.form_mut() {
                    form.insert_newline();
                }
            } else {
                app.submit_form();
            }
        }
        KeyCode::Up => {
            if let Some(form) = app.form_mut()
                && form.focus() == FormField::Tag
            {
                form.cycle_tag_prev();
            }
        }
        KeyCode::Down => {
            if let Some(form) = app.form_mut()
                && form.focus() == FormField::Tag
            {
                form.cycle_tag_next();
            }
        }
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            if let Some(form) = app.form_mut() {
                form.push_char(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.form_mut() {
                form.pop_char();
            }
        }
        _ => {
            // Ignore other keys in the modal
        }
    }
}
