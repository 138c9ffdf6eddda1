//! Shared fixtures for integration tests
//!
//! [`FakeService`] is a scripted [`MovieService`]: each query, poster and
//! equation gets a canned answer and a latency, and every call is recorded.
//! Run tests on a paused clock so latencies are deterministic.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep, sleep_until, Instant};

use moviemaths::api::MovieService;
use moviemaths::error::{ComputeError, ProviderError};
use moviemaths::models::{CacheRecord, Movie, Operator};

pub const POSTER_LATENCY: Duration = Duration::from_millis(20);

type EquationKey = (Operator, String, String);

#[derive(Default)]
pub struct FakeService {
    searches: HashMap<String, (Duration, Option<Vec<Movie>>)>,
    posters: HashMap<String, String>,
    answers: HashMap<EquationKey, (Duration, Option<String>)>,
    movies: HashMap<String, Movie>,
    search_calls: Mutex<Vec<String>>,
    poster_calls: Mutex<Vec<String>>,
    compute_calls: Mutex<Vec<EquationKey>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `movies` after `latency_ms`
    pub fn with_search(mut self, query: &str, latency_ms: u64, movies: Vec<Movie>) -> Self {
        self.searches.insert(
            query.to_string(),
            (Duration::from_millis(latency_ms), Some(movies)),
        );
        self
    }

    /// Fail `query` with a server error after `latency_ms`
    pub fn with_failing_search(mut self, query: &str, latency_ms: u64) -> Self {
        self.searches
            .insert(query.to_string(), (Duration::from_millis(latency_ms), None));
        self
    }

    /// Poster for `title`; titles without one fail the lookup
    pub fn with_poster(mut self, title: &str, url: &str) -> Self {
        self.posters.insert(title.to_string(), url.to_string());
        self
    }

    /// Movie known to `resolve_by_external_id`
    pub fn with_movie(mut self, movie: Movie) -> Self {
        self.movies.insert(movie.id.clone(), movie);
        self
    }

    /// `first <op> second = answer`, answered after `latency_ms`
    pub fn with_answer(
        mut self,
        operator: Operator,
        first: &str,
        second: &str,
        latency_ms: u64,
        answer: &Movie,
    ) -> Self {
        self.answers.insert(
            (operator, first.to_string(), second.to_string()),
            (Duration::from_millis(latency_ms), Some(answer.id.clone())),
        );
        self.with_movie(answer.clone())
    }

    /// `first <op> second` fails after `latency_ms`
    pub fn with_failing_answer(
        mut self,
        operator: Operator,
        first: &str,
        second: &str,
        latency_ms: u64,
    ) -> Self {
        self.answers.insert(
            (operator, first.to_string(), second.to_string()),
            (Duration::from_millis(latency_ms), None),
        );
        self
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn poster_calls(&self) -> Vec<String> {
        self.poster_calls.lock().unwrap().clone()
    }

    pub fn compute_calls(&self) -> Vec<EquationKey> {
        self.compute_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieService for FakeService {
    async fn search(&self, query: &str) -> Result<Vec<Movie>, ProviderError> {
        self.search_calls.lock().unwrap().push(query.to_string());
        match self.searches.get(query) {
            Some((latency, outcome)) => {
                sleep(*latency).await;
                outcome.clone().ok_or(ProviderError::ServerError(500))
            }
            None => Ok(Vec::new()),
        }
    }

    async fn resolve_image(&self, title: &str, _year: &str) -> Result<Option<String>, ProviderError> {
        self.poster_calls.lock().unwrap().push(title.to_string());
        sleep(POSTER_LATENCY).await;
        match self.posters.get(title) {
            Some(url) => Ok(Some(url.clone())),
            None => Err(ProviderError::NotFound),
        }
    }

    async fn resolve_by_external_id(&self, id: &str) -> Result<Option<Movie>, ProviderError> {
        Ok(self.movies.get(id).cloned())
    }

    async fn compute(&self, operator: Operator, first: &str, second: &str) -> Result<String, ComputeError> {
        let key = (operator, first.to_string(), second.to_string());
        self.compute_calls.lock().unwrap().push(key.clone());
        match self.answers.get(&key) {
            Some((latency, answer)) => {
                sleep(*latency).await;
                answer
                    .clone()
                    .ok_or(ComputeError::Service(ProviderError::ServerError(500)))
            }
            None => Err(ComputeError::Empty),
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn movie(id: &str, title: &str, year: &str) -> Movie {
    Movie::new(id, title, year)
}

pub fn record(id: &str, title: &str, year: &str) -> CacheRecord {
    CacheRecord {
        title: title.to_string(),
        external_id: id.to_string(),
        release_year: year.to_string(),
    }
}

pub fn alien() -> Movie {
    movie("tt0078748", "Alien", "1979")
}

pub fn aliens() -> Movie {
    movie("tt0090605", "Aliens", "1986")
}

pub fn predator() -> Movie {
    movie("tt0093773", "Predator", "1987")
}

// =============================================================================
// Event pumping
// =============================================================================

/// Feed events to `apply` until `duration` of (virtual) time has passed
pub async fn pump<E>(rx: &mut UnboundedReceiver<E>, duration: Duration, mut apply: impl FnMut(E)) {
    let deadline = Instant::now() + duration;
    loop {
        tokio::select! {
            _ = sleep_until(deadline) => break,
            event = rx.recv() => match event {
                Some(event) => apply(event),
                None => break,
            },
        }
    }
}
