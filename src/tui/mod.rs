//! Terminal User Interface module for nota.
//!
//! Provides an interactive note browser with search bar, note list,
//! detail view, and create-note modal, using ratatui for rendering and
//! crossterm for terminal management.

use std::io;
use std::panic;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::api::{NotesApi, NotesClientBuilder};
use crate::models::TagFilter;

mod app;
pub mod event;
mod ui;

pub use app::{App, Focus};

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
/// Returns a configured Terminal instance.
///
/// # Errors
///
/// Returns an error if terminal initialization fails.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Disables raw mode and leaves the alternate screen.
/// This should always be called before exiting the TUI,
/// even in error cases, to prevent terminal corruption.
///
/// # Errors
///
/// Returns an error if terminal restoration fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for panic handler.
///
/// Does not require a Terminal reference, making it safe to call
/// from a panic hook where we may not have access to the Terminal.
/// Ignores errors since we're likely already in a bad state.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Initializes a panic hook that restores the terminal before panicking.
///
/// This ensures the terminal is restored even if a panic occurs anywhere
/// in the application, not just in the event loop. The original panic
/// hook is preserved and called after terminal restoration.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the main event loop for the TUI.
///
/// Ticks the app (debounce commits, finished fetches, finished creates),
/// renders, and polls for keyboard events. Exits when a handler requests
/// quit or an error occurs.
///
/// # Errors
///
/// Returns an error if event polling, rendering, or terminal operations fail.
/// Terminal state is always restored, even on error.
pub fn run_event_loop(app: &mut App) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, &mut terminal);

    // Always restore terminal state
    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

/// Internal event loop implementation.
///
/// Separated from `run_event_loop` to ensure terminal restoration happens
/// in the outer function.
fn run_event_loop_internal(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        // Advance debounce timers and apply completed requests
        app.tick();

        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        // Poll with a timeout so pending debounce commits and in-flight
        // requests are picked up even without keyboard activity
        if crossterm_event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
        {
            let should_quit = event::handle_key_event(app, key);
            if should_quit {
                break;
            }
        }
    }

    Ok(())
}

/// Entry point for the TUI application.
///
/// Builds the HTTP client, fetches the first page up front so the first
/// frame renders real data, and starts the event loop.
///
/// # Errors
///
/// Returns an error if:
/// - Client configuration is invalid
/// - The initial page cannot be fetched
/// - Terminal initialization or the event loop fails
pub fn run(tag: TagFilter) -> Result<()> {
    // Install panic hook to restore terminal on panic
    init_panic_hook();

    let client = NotesClientBuilder::new()
        .build()
        .context("Failed to configure notes API client")?;
    let client: Arc<dyn NotesApi> = Arc::new(client);

    let mut app = App::new(Arc::clone(&client), tag);

    // Seed the coordinator with a pre-fetched first page; the first render
    // then needs no client-side round trip
    let initial = client
        .fetch_notes(&app.current_query())
        .context("Failed to load notes")?;
    app.seed(initial);

    run_event_loop(&mut app).context("TUI event loop failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{NewNote, Note, NoteBuilder};
    use crate::query::{NoteListPage, NoteListQuery};

    // Note: Terminal initialization tests are difficult to write in unit tests
    // because they require actual terminal capabilities. These are better tested
    // manually or with integration tests.

    struct StubApi;

    impl NotesApi for StubApi {
        fn fetch_notes(&self, _query: &NoteListQuery) -> Result<NoteListPage, ApiError> {
            Ok(NoteListPage {
                notes: vec![
                    NoteBuilder::new().id("1").title("First note").build(),
                    NoteBuilder::new().id("2").title("Second note").build(),
                ],
                total_pages: 1,
            })
        }

        fn create_note(&self, note: &NewNote) -> Result<Note, ApiError> {
            Ok(NoteBuilder::new().id("3").title(note.title()).build())
        }
    }

    #[test]
    fn seeding_populates_app_state() {
        let client: Arc<dyn NotesApi> = Arc::new(StubApi);
        let mut app = App::new(Arc::clone(&client), TagFilter::All);

        let initial = client.fetch_notes(&app.current_query()).unwrap();
        app.seed(initial);
        app.tick();

        assert_eq!(app.notes().len(), 2);
        assert_eq!(app.notes()[0].title, "First note");
    }

    #[test]
    fn initial_tag_filter_scopes_the_first_query() {
        use crate::models::NoteTag;

        let client: Arc<dyn NotesApi> = Arc::new(StubApi);
        let app = App::new(client, TagFilter::Tag(NoteTag::Work));

        assert_eq!(app.current_query().tag(), TagFilter::Tag(NoteTag::Work));
        assert_eq!(app.current_query().page(), 1);
    }
}
