//! Incremental search for one operand box
//!
//! Keystrokes are debounced; when the quiet window elapses the query is
//! answered from the cache or sent to the remote catalog. Every dispatched
//! search takes a fresh token, and a completion is displayed only if its
//! token is still the latest one, so a slow early search can never overwrite
//! a fast later one.
//!
//! The coordinator owns its state and is driven from a single event loop:
//! background tasks only post [`SearchEvent`]s, which the loop feeds back
//! through [`SearchCoordinator::handle`].

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::MovieService;
use crate::error::ProviderError;
use crate::generation::{Emitter, Generation, Token};
use crate::models::{Movie, SearchCache, Slot};

use super::cache;
use super::debounce::Debouncer;

/// Completions posted back to the owning event loop
#[derive(Debug)]
pub enum SearchEvent {
    /// The quiet window after the last keystroke elapsed
    DebounceElapsed { token: Token, query: String },
    /// A remote search finished
    Completed {
        token: Token,
        query: String,
        outcome: Result<Vec<Movie>, ProviderError>,
    },
    /// A poster was found for the selected movie
    Enriched { token: Token, movie: Movie },
}

/// Where the search box is in its cycle
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Debouncing,
    Searching,
    Failed(String),
}

/// New value for the operand this box feeds
#[derive(Debug, Clone, PartialEq)]
pub struct OperandChange {
    pub slot: Slot,
    pub movie: Option<Movie>,
}

pub struct SearchCoordinator {
    slot: Slot,
    service: Arc<dyn MovieService>,
    cache: Arc<SearchCache>,
    emit: Emitter<SearchEvent>,
    debouncer: Debouncer,
    searches: Generation,
    enrichment: Generation,
    enrichment_task: Option<JoinHandle<()>>,
    value: String,
    candidates: Vec<Movie>,
    status: SearchStatus,
}

impl SearchCoordinator {
    pub fn new(
        slot: Slot,
        service: Arc<dyn MovieService>,
        cache: Arc<SearchCache>,
        emit: Emitter<SearchEvent>,
    ) -> Self {
        Self {
            slot,
            service,
            cache,
            emit,
            debouncer: Debouncer::default(),
            searches: Generation::new(),
            enrichment: Generation::new(),
            enrichment_task: None,
            value: String::new(),
            candidates: Vec::new(),
            status: SearchStatus::Idle,
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debouncer = Debouncer::new(delay);
        self
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Raw text currently in the box
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn candidates(&self) -> &[Movie] {
        &self.candidates
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    /// Text in the box changed
    pub fn on_input_change(&mut self, value: &str) {
        self.value = value.to_string();
        let query = value.trim();

        if query.is_empty() {
            self.debouncer.cancel();
            self.searches.invalidate();
            self.candidates.clear();
            self.status = SearchStatus::Idle;
            return;
        }

        let emit = self.emit.clone();
        let query = query.to_string();
        self.debouncer.schedule(move |token| {
            emit.emit(SearchEvent::DebounceElapsed { token, query });
        });
        self.status = SearchStatus::Debouncing;
    }

    /// Apply a completion; returns an operand update when one is due
    pub fn handle(&mut self, event: SearchEvent) -> Option<OperandChange> {
        match event {
            SearchEvent::DebounceElapsed { token, query } => {
                if self.debouncer.is_current(token) {
                    self.dispatch(query);
                } else {
                    debug!(slot = %self.slot, %token, "ignoring cancelled debounce timer");
                }
                None
            }
            SearchEvent::Completed {
                token,
                query,
                outcome,
            } => {
                if !self.searches.is_current(token) {
                    debug!(slot = %self.slot, %token, %query, "discarding stale search results");
                    return None;
                }
                match outcome {
                    Ok(movies) => {
                        debug!(slot = %self.slot, %query, hits = movies.len(), "search completed");
                        self.candidates = movies;
                        self.status = SearchStatus::Idle;
                    }
                    Err(e) => {
                        warn!(slot = %self.slot, %query, error = %e, "search failed");
                        self.candidates.clear();
                        self.status = SearchStatus::Failed(e.to_string());
                    }
                }
                None
            }
            SearchEvent::Enriched { token, movie } => {
                if !self.enrichment.is_current(token) {
                    debug!(slot = %self.slot, %token, "discarding stale poster");
                    return None;
                }
                self.enrichment_task = None;
                Some(OperandChange {
                    slot: self.slot,
                    movie: Some(movie),
                })
            }
        }
    }

    /// Run the query now: cache first, remote catalog otherwise
    fn dispatch(&mut self, query: String) {
        let token = self.searches.issue();

        if let Some(movies) = cache::match_query(&query, &self.cache) {
            self.candidates = movies;
            self.status = SearchStatus::Idle;
            return;
        }

        info!(slot = %self.slot, %token, %query, "dispatching search");
        self.status = SearchStatus::Searching;
        let service = Arc::clone(&self.service);
        let emit = self.emit.clone();
        tokio::spawn(async move {
            let outcome = service.search(&query).await;
            emit.emit(SearchEvent::Completed {
                token,
                query,
                outcome,
            });
        });
    }

    /// Pick a candidate (or clear with `None`).
    ///
    /// The operand change is returned immediately with whatever image the
    /// movie already has; a poster lookup runs on the side and, if it finds
    /// one, arrives later as an [`SearchEvent::Enriched`] update. A failed
    /// lookup only leaves the movie without an image.
    pub fn select(&mut self, movie: Option<Movie>) -> OperandChange {
        self.debouncer.cancel();
        self.searches.invalidate();
        self.candidates.clear();
        self.status = SearchStatus::Idle;
        self.cancel_enrichment();

        self.value = movie.as_ref().map(|m| m.title.clone()).unwrap_or_default();

        if let Some(movie) = movie.as_ref().filter(|m| m.image.is_none()) {
            self.spawn_enrichment(movie.clone());
        }

        OperandChange {
            slot: self.slot,
            movie,
        }
    }

    /// Clear the selection and the box
    pub fn clear(&mut self) -> OperandChange {
        self.select(None)
    }

    fn spawn_enrichment(&mut self, movie: Movie) {
        let token = self.enrichment.issue();
        let service = Arc::clone(&self.service);
        let emit = self.emit.clone();
        let slot = self.slot;

        self.enrichment_task = Some(tokio::spawn(async move {
            match service.resolve_image(&movie.title, &movie.year).await {
                Ok(Some(image)) => {
                    emit.emit(SearchEvent::Enriched {
                        token,
                        movie: movie.with_image(Some(image)),
                    });
                }
                Ok(None) => debug!(%slot, title = %movie.title, "no poster found"),
                Err(e) => warn!(%slot, title = %movie.title, error = %e, "poster lookup failed"),
            }
        }));
    }

    fn cancel_enrichment(&mut self) {
        self.enrichment.invalidate();
        if let Some(handle) = self.enrichment_task.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if let Some(handle) = self.enrichment_task.take() {
            handle.abort();
        }
    }
}
