//! API clients for external services
//!
//! - TMDB: posters and IMDb id cross reference
//! - Compute: catalog search and movie arithmetic
//!
//! [`MovieService`] is the seam the search and equation layers talk to;
//! [`MetadataClient`] is the production implementation over both clients.

pub mod compute;
pub mod tmdb;

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::error::{ComputeError, ProviderError};
use crate::models::{Movie, Operator};

pub use compute::ComputeClient;
pub use tmdb::TmdbClient;

/// Remote movie lookups used by the search and equation layers
#[async_trait]
pub trait MovieService: Send + Sync {
    /// Remote fuzzy title search
    async fn search(&self, query: &str) -> Result<Vec<Movie>, ProviderError>;

    /// Best-effort poster URL for a title/year pair
    async fn resolve_image(&self, title: &str, year: &str) -> Result<Option<String>, ProviderError>;

    /// Display-ready movie for an external id
    async fn resolve_by_external_id(&self, id: &str) -> Result<Option<Movie>, ProviderError>;

    /// External id of `first <op> second`
    async fn compute(&self, operator: Operator, first: &str, second: &str) -> Result<String, ComputeError>;

    /// Compute and resolve the answer to a display-ready movie
    async fn solve(&self, operator: Operator, first: &str, second: &str) -> Result<Movie, ComputeError> {
        let id = self.compute(operator, first, second).await?;
        match self.resolve_by_external_id(&id).await? {
            Some(movie) => Ok(movie),
            None => Err(ComputeError::Unresolvable(id)),
        }
    }
}

/// Production [`MovieService`]: TMDB for metadata, the compute service for
/// catalog search and arithmetic.
pub struct MetadataClient {
    tmdb: TmdbClient,
    compute: ComputeClient,
}

impl MetadataClient {
    pub fn new(tmdb: TmdbClient, compute: ComputeClient) -> Self {
        Self { tmdb, compute }
    }

    /// Build both clients from configuration; fails without a TMDB key
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let tmdb = TmdbClient::with_base_url(config.tmdb_api_key()?, config.tmdb_base_url())
            .with_language(config.language());
        let compute = ComputeClient::new(config.compute_url());
        Ok(Self::new(tmdb, compute))
    }

    pub fn tmdb(&self) -> &TmdbClient {
        &self.tmdb
    }
}

#[async_trait]
impl MovieService for MetadataClient {
    async fn search(&self, query: &str) -> Result<Vec<Movie>, ProviderError> {
        info!(query, "searching remote catalog");
        let records = self.compute.search(query).await?;
        Ok(records.into_iter().map(Movie::from).collect())
    }

    async fn resolve_image(&self, title: &str, year: &str) -> Result<Option<String>, ProviderError> {
        self.tmdb.find_poster(title, year).await
    }

    async fn resolve_by_external_id(&self, id: &str) -> Result<Option<Movie>, ProviderError> {
        self.tmdb.find_by_imdb_id(id).await
    }

    async fn compute(&self, operator: Operator, first: &str, second: &str) -> Result<String, ComputeError> {
        self.compute.combine(operator, first, second).await
    }
}
