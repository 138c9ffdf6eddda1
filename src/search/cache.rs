//! Local answers for queries that extend a known fragment
//!
//! When some cached fragment is a substring of the query, the query is
//! answered from that fragment's bucket instead of the network. Typing more
//! characters narrows the bucket without another round trip.

use crate::models::{CacheRecord, Movie, SearchCache};

/// Answer `query` from the cache, or `None` when the network is needed.
///
/// The longest fragment contained in the query wins; on equal length the
/// first in cache order is kept. Its bucket is then filtered to titles that
/// contain the full query, compared case-insensitively, in bucket order.
pub fn match_query(query: &str, cache: &SearchCache) -> Option<Vec<Movie>> {
    let (key, records) = cache
        .iter()
        .filter(|(key, _)| query.contains(key))
        .fold(None::<(&str, &[CacheRecord])>, |best, (key, records)| match best {
            Some((best_key, _)) if best_key.len() >= key.len() => best,
            _ => Some((key, records)),
        })?;

    let needle = query.to_lowercase();
    let movies: Vec<Movie> = records
        .iter()
        .filter(|record| record.title.to_lowercase().contains(&needle))
        .map(|record| record.to_movie())
        .collect();

    tracing::debug!(query, key, hits = movies.len(), "answered from cache");
    Some(movies)
}
