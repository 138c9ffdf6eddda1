//! Error types for the metadata provider and the compute service

use thiserror::Error;

/// Network or parse failure talking to a remote service
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No TMDB API key configured (set TMDB_API_KEY or tmdb_api_key in config)")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Failure to produce a result movie from two operands
#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("Compute service failed: {0}")]
    Service(#[from] ProviderError),

    #[error("Computed movie {0} could not be resolved")]
    Unresolvable(String),

    #[error("Compute service returned no movie")]
    Empty,
}
