//! Configuration management for Movie Maths
//!
//! Handles config file loading/saving and service endpoints.
//! Config is stored at ~/.config/moviemaths/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::compute::DEFAULT_COMPUTE_URL;
use crate::api::tmdb::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use crate::error::ProviderError;
use crate::models::SearchCache;
use crate::search::DEFAULT_DEBOUNCE;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: Option<String>,
    /// TMDB API root (override for proxies and tests)
    pub tmdb_base_url: Option<String>,
    /// Movie arithmetic service root
    pub compute_url: Option<String>,
    /// Metadata language, e.g. "en-US"
    pub language: Option<String>,
    /// Search quiet window in milliseconds
    pub debounce_ms: Option<u64>,
    /// JSON file of known search fragments
    pub cache_file: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/moviemaths/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("moviemaths").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from a specific file, or return default if unreadable
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// TMDB API key: environment variable TMDB_API_KEY, then config file
    pub fn tmdb_api_key(&self) -> Result<String, ProviderError> {
        std::env::var("TMDB_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.tmdb_api_key.clone())
            .ok_or(ProviderError::MissingApiKey)
    }

    pub fn tmdb_base_url(&self) -> &str {
        self.tmdb_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Compute service root: MOVIEMATHS_COMPUTE_URL, then config, then default
    pub fn compute_url(&self) -> String {
        std::env::var("MOVIEMATHS_COMPUTE_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| self.compute_url.clone())
            .unwrap_or_else(|| DEFAULT_COMPUTE_URL.to_string())
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE)
    }

    /// Search cache from `cache_file`; empty when unset or unreadable
    pub fn search_cache(&self) -> SearchCache {
        let Some(path) = self.cache_file.as_deref() else {
            return SearchCache::new();
        };
        match SearchCache::load(path) {
            Ok(cache) => {
                tracing::info!(path = %path.display(), fragments = cache.len(), "loaded search cache");
                cache
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "search cache unavailable");
                SearchCache::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.tmdb_api_key.is_none());
        assert_eq!(config.tmdb_base_url(), "https://api.themoviedb.org/3");
        assert_eq!(config.language(), "en-US");
        assert_eq!(config.debounce(), Duration::from_millis(150));
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            tmdb_api_key: Some("abc".into()),
            compute_url: Some("http://maths:5000".into()),
            debounce_ms: Some(300),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_malformed_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debounce_ms = \"soon\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_search_cache_from_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{"bat": [{"title": "Batman", "release_year": 1989, "external_id": "tt0096895"}]}"#,
        )
        .unwrap();

        let config = Config {
            cache_file: Some(path),
            ..Config::default()
        };
        assert_eq!(config.search_cache().len(), 1);

        let missing = Config {
            cache_file: Some(dir.path().join("nope.json")),
            ..Config::default()
        };
        assert!(missing.search_cache().is_empty());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from(Path::new("/definitely/not/here.toml"));
        assert_eq!(config, Config::default());
    }
}
