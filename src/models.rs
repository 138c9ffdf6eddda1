//! Data structures shared across Movie Maths
//!
//! - **Movie**: a display-ready movie keyed by its external (IMDb) id
//! - **Equation**: operator, operand slots and the derived result slot
//! - **Cache**: the fragment -> candidates mapping consulted before the network

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::ProviderError;

// =============================================================================
// Movie
// =============================================================================

/// A movie as shown in an operand or result slot.
///
/// Identity is the external id; title, year and image are descriptive only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    /// Four digit year, or a placeholder such as "????" when unknown
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Movie {
    pub fn new(id: impl Into<String>, title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: year.into(),
            image: None,
        }
    }

    /// Same movie with a poster attached
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// True when the year is an actual number and worth displaying
    pub fn has_known_year(&self) -> bool {
        !self.year.is_empty() && self.year.chars().all(|c| c.is_ascii_digit())
    }
}

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Movie {}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_known_year() {
            write!(f, "{} ({})", self.title, self.year)
        } else {
            write!(f, "{}", self.title)
        }
    }
}

/// Extract the year component of a date string like "1999-03-31"
pub fn year_from_release_date(date: Option<&str>) -> String {
    date.and_then(|d| d.split('-').next())
        .filter(|y| !y.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "????".to_string())
}

// =============================================================================
// Equation
// =============================================================================

/// How the two operands are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[default]
    Add,
    Subtract,
}

impl Operator {
    pub fn toggled(self) -> Self {
        match self {
            Operator::Add => Operator::Subtract,
            Operator::Subtract => Operator::Add,
        }
    }

    /// Path segment on the compute service
    pub fn endpoint(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Subtract => "subtract",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "−",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// One of the two user-editable operand slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::First => write!(f, "first"),
            Slot::Second => write!(f, "second"),
        }
    }
}

/// The derived, read-only output of the equation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultSlot {
    #[default]
    Empty,
    Loading,
    Ready(Movie),
    Failed(String),
}

impl ResultSlot {
    pub fn is_empty(&self) -> bool {
        matches!(self, ResultSlot::Empty)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResultSlot::Loading)
    }

    pub fn movie(&self) -> Option<&Movie> {
        match self {
            ResultSlot::Ready(movie) => Some(movie),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResultSlot::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Search Cache
// =============================================================================

/// Candidate record as stored in the search cache and returned by the
/// compute service catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    #[serde(alias = "simpleTitle")]
    pub title: String,
    #[serde(alias = "IMDbId")]
    pub external_id: String,
    #[serde(default, deserialize_with = "year_as_string")]
    pub release_year: String,
}

impl CacheRecord {
    pub fn to_movie(&self) -> Movie {
        Movie::new(&self.external_id, &self.title, &self.release_year)
    }
}

impl From<CacheRecord> for Movie {
    fn from(record: CacheRecord) -> Self {
        Movie::new(record.external_id, record.title, record.release_year)
    }
}

/// Accept `1999`, `"1999"` or `null` for a release year
fn year_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Year>::deserialize(deserializer)? {
        Some(Year::Number(n)) => n.to_string(),
        Some(Year::Float(n)) if n.is_finite() => (n as i64).to_string(),
        Some(Year::Float(_)) => "NaN".to_string(),
        Some(Year::Text(s)) => s,
        None => "NaN".to_string(),
    })
}

/// Known title fragments mapped to their candidate lists.
///
/// Iteration order is insertion order (file order when loaded from JSON).
#[derive(Debug, Clone, Default)]
pub struct SearchCache {
    entries: Vec<(String, Vec<CacheRecord>)>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bucket; a repeated key replaces the earlier bucket in place
    pub fn insert(&mut self, key: impl Into<String>, records: Vec<CacheRecord>) {
        let key = key.into();
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = records;
        } else {
            self.entries.push((key, records));
        }
    }

    pub fn get(&self, key: &str) -> Option<&[CacheRecord]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, records)| records.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CacheRecord])> {
        self.entries
            .iter()
            .map(|(k, records)| (k.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object of `fragment -> [record, ...]`
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| ProviderError::InvalidResponse(format!("cache file: {}", e)))?;

        let mut cache = Self::new();
        for (key, value) in map {
            let records: Vec<CacheRecord> = serde_json::from_value(value).map_err(|e| {
                ProviderError::InvalidResponse(format!("cache bucket '{}': {}", key, e))
            })?;
            cache.insert(key, records);
        }
        Ok(cache)
    }

    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::InvalidResponse(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<CacheRecord>)> for SearchCache {
    fn from_iter<I: IntoIterator<Item = (K, Vec<CacheRecord>)>>(iter: I) -> Self {
        let mut cache = Self::new();
        for (key, records) in iter {
            cache.insert(key, records);
        }
        cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_identity_is_id() {
        let a = Movie::new("tt0372784", "Batman Begins", "2005");
        let b = Movie::new("tt0372784", "batman begins", "????")
            .with_image(Some("http://img/x.jpg".into()));
        let c = Movie::new("tt0468569", "Batman Begins", "2005");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_year_from_release_date() {
        assert_eq!(year_from_release_date(Some("1999-03-31")), "1999");
        assert_eq!(year_from_release_date(Some("")), "????");
        assert_eq!(year_from_release_date(None), "????");
    }

    #[test]
    fn test_display_hides_unknown_year() {
        assert_eq!(Movie::new("tt1", "Alien", "1979").to_string(), "Alien (1979)");
        assert_eq!(Movie::new("tt1", "Alien", "NaN").to_string(), "Alien");
    }

    #[test]
    fn test_operator_toggle() {
        assert_eq!(Operator::Add.toggled(), Operator::Subtract);
        assert_eq!(Operator::Subtract.toggled().toggled(), Operator::Subtract);
        assert_eq!(Operator::default(), Operator::Add);
    }

    #[test]
    fn test_cache_from_json_keeps_file_order() {
        let json = r#"{
            "zoo": [],
            "bat": [{"title": "Batman", "release_year": 1989, "external_id": "tt0096895"}],
            "alien": [{"simpleTitle": "Aliens", "release_year": "1986", "IMDbId": "tt0090605"}]
        }"#;
        let cache = SearchCache::from_json(json).unwrap();
        let keys: Vec<&str> = cache.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zoo", "bat", "alien"]);

        let bat = cache.get("bat").unwrap();
        assert_eq!(bat[0].release_year, "1989");
        let alien = cache.get("alien").unwrap();
        assert_eq!(alien[0].title, "Aliens");
        assert_eq!(alien[0].external_id, "tt0090605");
    }

    #[test]
    fn test_cache_rejects_malformed_bucket() {
        let err = SearchCache::from_json(r#"{"bat": {"title": "Batman"}}"#).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
