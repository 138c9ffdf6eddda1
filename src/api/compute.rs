//! Movie arithmetic service client
//!
//! The service is opaque: given two IMDb ids and an operation it answers
//! with a third IMDb id. It also exposes a fuzzy title search over its own
//! catalog, whose ids are the ones the arithmetic endpoints understand.

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{ComputeError, ProviderError};
use crate::models::{CacheRecord, Operator};

pub const DEFAULT_COMPUTE_URL: &str = "http://localhost:5000";

/// Compute service client
pub struct ComputeClient {
    base_url: String,
    client: reqwest::Client,
}

impl ComputeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(params).send().await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| ProviderError::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound),
            status => Err(ProviderError::ServerError(status.as_u16())),
        }
    }

    /// Fuzzy title search over the service catalog
    pub async fn search(&self, query: &str) -> Result<Vec<CacheRecord>, ProviderError> {
        self.get("/movies", &[("query", query)]).await
    }

    /// Combine two movies, returning the IMDb id of the answer
    pub async fn combine(
        &self,
        operator: Operator,
        first: &str,
        second: &str,
    ) -> Result<String, ComputeError> {
        debug!(%operator, first, second, "computing movie");
        let endpoint = format!("/{}", operator.endpoint());
        let response: ComputeResponse = self
            .get(&endpoint, &[("movie_imdb_1", first), ("movie_imdb_2", second)])
            .await?;

        let id = response.into_id();
        if id.trim().is_empty() {
            return Err(ComputeError::Empty);
        }
        Ok(id)
    }
}

/// Either a bare JSON string or an object with a single id field
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ComputeResponse {
    Bare(String),
    Wrapped {
        #[serde(alias = "id", alias = "IMDbId")]
        imdb_id: String,
    },
}

impl ComputeResponse {
    fn into_id(self) -> String {
        match self {
            ComputeResponse::Bare(id) => id,
            ComputeResponse::Wrapped { imdb_id } => imdb_id,
        }
    }
}
