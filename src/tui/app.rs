use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::debug;

use crate::api::{ApiError, NotesApi};
use crate::debounce::Debouncer;
use crate::form::NoteForm;
use crate::models::{Note, TagFilter};
use crate::query::{NoteListPage, NoteListQuery};
use crate::store::{NoteStore, QueryState};

/// Application state for the TUI.
///
/// Composes the data-fetch coordinator, the debounced search input, the
/// pagination cursor, the tag filter, and the create-note modal.
pub struct App {
    client: Arc<dyn NotesApi>,
    store: NoteStore,
    /// Raw search input buffer (what the user is typing)
    search_input: String,
    /// Committed search term (what the current query uses)
    committed_search: String,
    /// Quiet-period timer between the two
    debouncer: Debouncer,
    /// Current 1-based page
    page: u32,
    /// Tag filter, fixed for the lifetime of the view
    tag: TagFilter,
    /// Currently focused panel
    focus: Focus,
    /// Currently selected note index (None if no selection)
    selected_index: Option<usize>,
    /// Create-note form; `Some` while the modal is open
    form: Option<NoteForm>,
    /// Pending create request, if one is in flight
    create_rx: Option<Receiver<Result<Note, ApiError>>>,
    /// What the list view rendered last tick
    view: QueryState,
    /// Total pages reported by the most recent successful fetch
    total_pages: u32,
}

/// Panel focus state for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Search bar is focused (typing feeds the debouncer)
    SearchInput,
    /// Note list is focused (j/k navigation, h/l pagination)
    NoteList,
}

impl App {
    /// Creates a new App for the given client and initial tag filter.
    pub fn new(client: Arc<dyn NotesApi>, tag: TagFilter) -> Self {
        let store = NoteStore::new(Arc::clone(&client));
        Self {
            client,
            store,
            search_input: String::new(),
            committed_search: String::new(),
            debouncer: Debouncer::default(),
            page: 1,
            tag,
            focus: Focus::SearchInput,
            selected_index: None,
            form: None,
            create_rx: None,
            view: QueryState::Loading,
            total_pages: 1,
        }
    }

    /// The query describing what the view currently wants to show.
    pub fn current_query(&self) -> NoteListQuery {
        NoteListQuery::new(self.committed_search.clone(), self.page, self.tag)
    }

    /// Hands the coordinator a pre-fetched first page.
    pub fn seed(&mut self, page: NoteListPage) {
        self.store.seed(self.current_query(), page);
    }

    /// Advances time-driven state: commits a quiet search term, applies a
    /// finished create request, and refreshes the list view.
    ///
    /// Called once per event-loop iteration, before rendering.
    pub fn tick(&mut self) {
        if self.debouncer.take() {
            self.commit_search();
        }
        self.poll_create();

        self.view = self.store.resolve(&self.current_query());
        if let QueryState::Success(page) = &self.view {
            self.total_pages = page.total_pages.max(1);
            // Keep the selection inside the rendered page
            if let Some(i) = self.selected_index
                && i >= page.notes.len()
            {
                self.selected_index = page.notes.len().checked_sub(1);
            }
        }
    }

    /// Returns the state the list view should render.
    pub fn view(&self) -> &QueryState {
        &self.view
    }

    /// Returns the notes on the currently rendered page.
    pub fn notes(&self) -> &[Note] {
        match &self.view {
            QueryState::Success(page) => &page.notes,
            _ => &[],
        }
    }

    /// Returns the raw search input buffer.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Returns the committed search term.
    pub fn committed_search(&self) -> &str {
        &self.committed_search
    }

    /// Returns the current 1-based page.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the total pages for the current query.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Returns the active tag filter.
    pub fn tag(&self) -> TagFilter {
        self.tag
    }

    /// Returns the current focus state.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Returns the currently selected note index.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Returns the currently selected note, if any.
    pub fn selected_note(&self) -> Option<&Note> {
        self.selected_index.and_then(|i| self.notes().get(i))
    }

    // --- Search input ---

    /// Adds a character to the search buffer and re-arms the debouncer.
    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.debouncer.record_change();
    }

    /// Removes the last character from the search buffer and re-arms the
    /// debouncer.
    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
        self.debouncer.record_change();
    }

    /// Commits the search term immediately, skipping the quiet period.
    pub fn flush_search(&mut self) {
        self.debouncer.cancel();
        self.commit_search();
    }

    /// A committed search term replaces the old one and resets pagination.
    fn commit_search(&mut self) {
        self.committed_search = self.search_input.clone();
        self.page = 1;
        self.selected_index = None;
    }

    // --- Pagination ---

    /// Turns to the next page, clamped to the last known total.
    pub fn next_page(&mut self) {
        if self.page < self.total_pages {
            self.page += 1;
            self.selected_index = None;
        }
    }

    /// Turns to the previous page.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.selected_index = None;
        }
    }

    // --- Selection ---

    /// Moves selection down, wrapping at the end of the page.
    pub fn select_next(&mut self) {
        let count = self.notes().len();
        if count == 0 {
            self.selected_index = None;
            return;
        }
        self.selected_index = Some(match self.selected_index {
            None => 0,
            Some(i) if i + 1 >= count => 0,
            Some(i) => i + 1,
        });
    }

    /// Moves selection up, wrapping at the start of the page.
    pub fn select_previous(&mut self) {
        let count = self.notes().len();
        if count == 0 {
            self.selected_index = None;
            return;
        }
        self.selected_index = Some(match self.selected_index {
            None | Some(0) => count - 1,
            Some(i) => i - 1,
        });
    }

    /// Clears the selection (Esc key behavior).
    pub fn clear_selection(&mut self) {
        self.selected_index = None;
    }

    // --- Focus ---

    /// Cycles focus between the search bar and the note list.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::SearchInput => Focus::NoteList,
            Focus::NoteList => Focus::SearchInput,
        };
        if self.focus == Focus::NoteList && self.selected_index.is_none() && !self.notes().is_empty()
        {
            self.selected_index = Some(0);
        }
    }

    /// Returns focus to the search bar.
    pub fn reset_focus(&mut self) {
        self.focus = Focus::SearchInput;
    }

    // --- Create-note modal ---

    /// Returns the open form, if the modal is showing.
    pub fn form(&self) -> Option<&NoteForm> {
        self.form.as_ref()
    }

    /// Returns the open form mutably.
    pub fn form_mut(&mut self) -> Option<&mut NoteForm> {
        self.form.as_mut()
    }

    /// Opens the create-note modal with a fresh form.
    pub fn open_form(&mut self) {
        if self.form.is_none() {
            self.form = Some(NoteForm::new());
        }
    }

    /// Closes the modal. Ignored while a create request is in flight.
    pub fn close_form(&mut self) {
        if self.form.as_ref().is_some_and(NoteForm::is_pending) {
            return;
        }
        self.form = None;
    }

    /// Validates the form and, if it passes, submits the create request on
    /// a background thread. Invalid forms never reach the service.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let Some(note) = form.begin_submit() else {
            return;
        };

        let client = Arc::clone(&self.client);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(client.create_note(&note));
        });
        self.create_rx = Some(rx);
    }

    /// Applies a finished create request, if one has completed.
    ///
    /// On success the form resets, the modal closes, and every cached list
    /// query is invalidated so the next render refetches. On failure the
    /// form keeps its values and shows the failure.
    fn poll_create(&mut self) {
        let Some(rx) = self.create_rx.take() else {
            return;
        };
        match rx.try_recv() {
            Err(TryRecvError::Empty) => {
                self.create_rx = Some(rx);
            }
            Ok(Ok(note)) => {
                debug!(id = %note.id, "note created");
                if let Some(form) = self.form.as_mut() {
                    form.submit_succeeded();
                }
                self.form = None;
                self.store.invalidate_notes();
            }
            Ok(Err(error)) => {
                if let Some(form) = self.form.as_mut() {
                    form.submit_failed(&error);
                }
            }
            Err(TryRecvError::Disconnected) => {
                if let Some(form) = self.form.as_mut() {
                    form.fail_generic();
                }
            }
        }
    }

    /// Forces a refetch of the current query (manual refresh).
    pub fn refresh(&mut self) {
        self.store.invalidate_notes();
    }
}
