//! Response envelopes of the backend endpoints.
//!
//! Fields the client does not act on are left out; serde ignores them.

use std::collections::BTreeMap;

use catalog::{Algorithm, GenreId, Movie};
use serde::{Deserialize, Serialize};

/// `GET /health`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub initialized: bool,
    #[serde(default)]
    pub status: Option<String>,
    /// Seconds since the backend started
    #[serde(default)]
    pub uptime: Option<f64>,
}

/// `GET /init`: opaque confirmation, kept for logging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitConfirmation {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseCounts {
    #[serde(default)]
    pub movies: u64,
    #[serde(default)]
    pub ratings: u64,
    #[serde(default)]
    pub users: u64,
}

/// `GET /stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub database: DatabaseCounts,
}

/// One entry of `GET /genres`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreEntry {
    pub genre: GenreId,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Shared shape of the three recommendation endpoints.
///
/// `/recommendations/{id}` fills `movie_id`, `/genre-recommendations`
/// fills `genres`, `/user-recommendations/{id}` fills `user_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEnvelope {
    #[serde(default)]
    pub movie_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub genres: Vec<GenreId>,
    #[serde(default)]
    pub recommendations: Vec<Movie>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub explanation: String,
    /// Value range, e.g. "0-1" or "-1 to 1"
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub best_for: String,
    #[serde(default)]
    pub formula: String,
}

/// `GET /methods`: similarity metrics the backend exposes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodCatalog {
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub details: BTreeMap<String, MethodDetail>,
    /// Suggested metric per use case, e.g. "for_movies" -> "cosine"
    #[serde(default)]
    pub recommendations: BTreeMap<String, String>,
}

impl MethodCatalog {
    /// Advertised methods the client knows how to request; unknown ids are skipped
    pub fn algorithms(&self) -> Vec<Algorithm> {
        self.methods
            .iter()
            .filter_map(|m| m.parse::<Algorithm>().ok())
            .collect()
    }

    pub fn suggested(&self, use_case: &str) -> Option<Algorithm> {
        self.recommendations
            .get(use_case)
            .and_then(|m| m.parse::<Algorithm>().ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityComparison {
    #[serde(default)]
    pub genres_match: bool,
    #[serde(default)]
    pub year_diff: Option<i64>,
}

/// `GET /similarity/{a}/{b}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    pub movie1: Movie,
    pub movie2: Movie,
    pub selected_method: String,
    #[serde(default)]
    pub similarity: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
    /// Similarity under every metric, for comparison
    #[serde(default)]
    pub all_methods: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub comparison: Option<SimilarityComparison>,
}
