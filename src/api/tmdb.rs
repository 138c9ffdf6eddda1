//! TMDB (The Movie Database) API client
//!
//! Poster lookup and IMDb id cross reference for Movie Maths.
//! API docs: https://developer.themoviedb.org/docs

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::{year_from_release_date, Movie};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Poster width requested from the image CDN
const POSTER_SIZE: &str = "w300";

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    language: String,
    client: reqwest::Client,
    max_retries: u32,
    /// Fetched on first use, then read-only for the life of the client
    configuration: OnceCell<Configuration>,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
            configuration: OnceCell::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Make an authenticated GET request with retry logic for rate limits
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut retries = 0;

        loop {
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("language", self.language.as_str()),
                    ("api_key", self.api_key.as_str()),
                ])
                .query(params)
                .header("Accept", "application/json")
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    let parsed: T = serde_json::from_str(&body).map_err(|e| {
                        ProviderError::InvalidResponse(format!("JSON parse error: {}", e))
                    })?;
                    return Ok(parsed);
                }
                StatusCode::NOT_FOUND => {
                    return Err(ProviderError::NotFound);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(ProviderError::RateLimited);
                    }

                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    debug!(endpoint, wait_secs, "TMDB rate limited, backing off");
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(ProviderError::ServerError(status.as_u16()));
                }
            }
        }
    }

    /// Provider configuration, fetched once and memoized
    pub async fn configuration(&self) -> Result<&Configuration, ProviderError> {
        self.configuration
            .get_or_try_init(|| async {
                debug!("fetching TMDB configuration");
                self.get::<Configuration>("/configuration", &[]).await
            })
            .await
    }

    /// Full poster URL for a `poster_path` fragment
    pub async fn poster_url(&self, poster_path: &str) -> Result<String, ProviderError> {
        let configuration = self.configuration().await?;
        Ok(format!(
            "{}{}{}",
            configuration.images.base_url, POSTER_SIZE, poster_path
        ))
    }

    /// Search movies by title, optionally narrowed to a release year
    pub async fn search_movies(
        &self,
        query: &str,
        year: Option<&str>,
    ) -> Result<Vec<TmdbMovie>, ProviderError> {
        let mut params = vec![("page", "1"), ("query", query)];
        if let Some(year) = year {
            params.push(("year", year));
        }

        let response: SearchResponse = self.get("/search/movie", &params).await?;
        Ok(response.results)
    }

    /// Poster of the first search hit for `title`, if it has one.
    ///
    /// Non-numeric years ("????", "NaN") are not sent as a filter.
    pub async fn find_poster(&self, title: &str, year: &str) -> Result<Option<String>, ProviderError> {
        let year = Some(year).filter(|y| !y.is_empty() && y.chars().all(|c| c.is_ascii_digit()));
        let results = self.search_movies(title, year).await?;

        match results.into_iter().next().and_then(|m| m.poster_path) {
            Some(path) => Ok(Some(self.poster_url(&path).await?)),
            None => Ok(None),
        }
    }

    /// Resolve an IMDb id to a display-ready movie
    pub async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Option<Movie>, ProviderError> {
        let endpoint = format!("/find/{}", imdb_id);
        let response: FindResponse = self
            .get(&endpoint, &[("external_source", "imdb_id")])
            .await?;

        let Some(found) = response.movie_results.into_iter().next() else {
            return Ok(None);
        };

        let image = match found.poster_path.as_deref() {
            Some(path) => Some(self.poster_url(path).await?),
            None => None,
        };

        Ok(Some(
            Movie::new(
                imdb_id,
                found.title,
                year_from_release_date(found.release_date.as_deref()),
            )
            .with_image(image),
        ))
    }
}

// =============================================================================
// Response Structures
// =============================================================================

/// `GET /configuration`
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    pub images: ImagesConfiguration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfiguration {
    pub base_url: String,
    #[serde(default)]
    pub secure_base_url: Option<String>,
}

/// A movie as TMDB returns it from search and find
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbMovie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_response_tolerates_missing_fields() {
        let json = r#"{
            "movie_results": [{"title": "Heat", "release_date": null}],
            "tv_results": []
        }"#;
        let parsed: FindResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.movie_results[0].title, "Heat");
        assert!(parsed.movie_results[0].poster_path.is_none());
    }

    #[test]
    fn test_find_response_without_movies() {
        let parsed: FindResponse = serde_json::from_str(r#"{"person_results": []}"#).unwrap();
        assert!(parsed.movie_results.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TmdbClient::with_base_url("k", "http://localhost:1234/");
        assert_eq!(client.base_url, "http://localhost:1234");
    }
}
