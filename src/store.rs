//! Data-fetch coordination for note lists.
//!
//! `NoteStore` turns the current `(search, page, tag)` tuple into exactly
//! one of three states (loading, error, or success) while caching every
//! fetched page under its full query key. A background worker drives the
//! blocking HTTP client so the UI loop never waits on the network.
//!
//! Two policies shape the behavior:
//!
//! - **Stale-while-revalidate**: when the key changes (a page turn, a new
//!   search) or the cache is invalidated, the previously shown page stays
//!   visible until the replacement arrives. Only a store that has never
//!   shown anything reports `Loading`.
//! - **Ordering**: a completed fetch is applied only if its key is still
//!   the current one; responses for abandoned keys are discarded silently
//!   and never overwrite what the user is looking at.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::api::{ApiError, NotesApi};
use crate::query::{NoteListPage, NoteListQuery};

/// Outcome of resolving a query. The three states are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// No data to show yet; the fetch is in flight.
    Loading,
    /// The fetch for this key failed. Terminal for the key: retrying takes
    /// an explicit invalidation, never an automatic retry.
    Error(String),
    /// A page to render. May be a stale page while a refetch runs.
    Success(NoteListPage),
}

/// A cached page stamped with the store generation it was fetched under.
struct CacheEntry {
    page: NoteListPage,
    generation: u64,
}

struct FetchJob {
    query: NoteListQuery,
    generation: u64,
}

struct FetchOutcome {
    query: NoteListQuery,
    generation: u64,
    result: Result<NoteListPage, ApiError>,
}

/// Client-side cache and fetch coordinator for note list queries.
pub struct NoteStore {
    cache: HashMap<NoteListQuery, CacheEntry>,
    errors: HashMap<NoteListQuery, String>,
    in_flight: Vec<NoteListQuery>,
    generation: u64,
    last_shown: Option<NoteListPage>,
    job_tx: Sender<FetchJob>,
    outcome_rx: Receiver<FetchOutcome>,
}

impl NoteStore {
    /// Creates a store backed by the given client.
    ///
    /// Spawns the fetch worker thread. The worker exits when the store is
    /// dropped and its job channel closes.
    pub fn new(client: Arc<dyn NotesApi>) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<FetchJob>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(FetchJob { query, generation }) = job_rx.recv() {
                let result = client.fetch_notes(&query);
                let outcome = FetchOutcome {
                    query,
                    generation,
                    result,
                };
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
            }
        });

        Self {
            cache: HashMap::new(),
            errors: HashMap::new(),
            in_flight: Vec::new(),
            generation: 0,
            last_shown: None,
            job_tx,
            outcome_rx,
        }
    }

    /// Resolves the current query into a renderable state.
    ///
    /// Call this once per frame with whatever the UI currently asks for.
    /// A fresh cache hit is returned without any network activity; a miss
    /// or a stale hit enqueues a fetch (at most one in flight per key)
    /// and keeps the previously shown page visible in the meantime.
    pub fn resolve(&mut self, query: &NoteListQuery) -> QueryState {
        self.drain(query);

        if let Some(message) = self.errors.get(query) {
            return QueryState::Error(message.clone());
        }

        if let Some(entry) = self.cache.get(query) {
            if entry.generation < self.generation {
                // Invalidated: refetch, but keep showing the stale page
                let page = entry.page.clone();
                self.enqueue(query);
                self.last_shown = Some(page.clone());
                return QueryState::Success(page);
            }
            let page = entry.page.clone();
            self.last_shown = Some(page.clone());
            return QueryState::Success(page);
        }

        self.enqueue(query);
        match &self.last_shown {
            Some(page) => QueryState::Success(page.clone()),
            None => QueryState::Loading,
        }
    }

    /// Installs a pre-fetched page for a query.
    ///
    /// Used to hand the coordinator a first page fetched before the UI
    /// loop starts, so the first render needs no client-side round trip.
    pub fn seed(&mut self, query: NoteListQuery, page: NoteListPage) {
        self.last_shown = Some(page.clone());
        self.cache.insert(
            query,
            CacheEntry {
                page,
                generation: self.generation,
            },
        );
    }

    /// Marks every cached list query stale and clears recorded errors.
    ///
    /// The next `resolve` for any key refetches while continuing to show
    /// the stale page. Called after a successful note creation, when any
    /// cached list may be missing the new note.
    pub fn invalidate_notes(&mut self) {
        self.generation += 1;
        self.errors.clear();
        debug!(generation = self.generation, "invalidated note list cache");
    }

    /// Applies completed fetches, discarding those for abandoned keys.
    fn drain(&mut self, current: &NoteListQuery) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.in_flight.retain(|q| q != &outcome.query);

            if outcome.query != *current {
                // The user has moved on; a late response for the old key
                // must not overwrite what is on screen.
                debug!(
                    page = outcome.query.page(),
                    search = outcome.query.search(),
                    "discarding response for abandoned query"
                );
                continue;
            }

            match outcome.result {
                Ok(page) => {
                    self.errors.remove(&outcome.query);
                    self.cache.insert(
                        outcome.query,
                        CacheEntry {
                            page,
                            // Stamped with the generation at enqueue time, so
                            // a fetch that raced an invalidation stays stale.
                            generation: outcome.generation,
                        },
                    );
                }
                Err(error) => {
                    debug!(%error, "note list fetch failed");
                    self.cache.remove(&outcome.query);
                    self.errors.insert(outcome.query, error.to_string());
                }
            }
        }
    }

    /// Queues a fetch for the key unless one is already in flight.
    fn enqueue(&mut self, query: &NoteListQuery) {
        if self.in_flight.contains(query) {
            return;
        }
        self.in_flight.push(query.clone());

        let job = FetchJob {
            query: query.clone(),
            generation: self.generation,
        };
        if self.job_tx.send(job).is_err() {
            warn!("fetch worker is no longer running");
        }
    }
}
