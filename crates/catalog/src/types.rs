//! Core value types shared by every ReelDiscover crate.
//!
//! Everything here is received from (or sent to) the recommendation
//! backend. The client never mutates a [`Movie`]; it only filters and
//! re-slices references to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};
use crate::wire;

// =============================================================================
// Type Aliases
// =============================================================================

/// Stable movie identifier as served by the backend
pub type MovieId = String;

/// Identifier of a rating user in the backend dataset
pub type UserId = u32;

/// Genre identifier, e.g. "Sci-Fi" (open set, served by `/genres`)
pub type GenreId = String;

/// Number of similar movies shown in a detail preview
pub const SIMILAR_PREVIEW_LEN: usize = 4;

// =============================================================================
// Movie-related Types
// =============================================================================

/// A movie as listed by the browse, genre and recommendation endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "movieId", deserialize_with = "wire::movie_id")]
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_title: Option<String>,
    /// Ordered genre ids, parsed from the pipe-delimited wire form
    #[serde(
        default,
        deserialize_with = "wire::genre_list",
        serialize_with = "wire::serialize_genre_list"
    )]
    pub genres: Vec<GenreId>,
    #[serde(default, deserialize_with = "wire::optional_year")]
    pub year: Option<u16>,

    // Rank-quality fields; which ones are present depends on the endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(default, deserialize_with = "wire::optional_count", skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u64>,
    #[serde(default, deserialize_with = "wire::optional_count", skip_serializing_if = "Option::is_none")]
    pub total_ratings: Option<u64>,
}

impl Movie {
    /// Create a bare movie with no rank-quality fields
    pub fn new(movie_id: impl Into<MovieId>, title: impl Into<String>, genres: Vec<GenreId>) -> Self {
        Self {
            movie_id: movie_id.into(),
            title: title.into(),
            clean_title: None,
            genres,
            year: None,
            similarity: None,
            similarity_score: None,
            avg_rating: None,
            rating_count: None,
            total_ratings: None,
        }
    }

    /// Release year, falling back to the "(YYYY)" suffix of the title
    pub fn release_year(&self) -> Option<u16> {
        self.year.or_else(|| wire::extract_year_from_title(&self.title))
    }

    /// Title without the year suffix when the backend provided one
    pub fn display_title(&self) -> &str {
        self.clean_title.as_deref().unwrap_or(&self.title)
    }

    /// Best available similarity figure for display
    pub fn relevance(&self) -> Option<f64> {
        self.similarity.or(self.similarity_score)
    }

    /// Number of ratings, whichever field the endpoint filled in
    pub fn ratings(&self) -> Option<u64> {
        self.rating_count.or(self.total_ratings)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g.eq_ignore_ascii_case(genre))
    }
}

/// Aggregated rating statistics returned with a movie detail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default, deserialize_with = "wire::count")]
    pub total_ratings: u64,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub max_rating: Option<f64>,
}

/// Extended information for a single movie (`GET /movies/{movieId}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub stats: Option<RatingStats>,
    #[serde(default)]
    pub similar_movies: Vec<Movie>,
    #[serde(default, deserialize_with = "wire::optional_count")]
    pub users_who_rated: Option<u64>,
}

impl MovieDetail {
    /// The bounded preview of similar movies (first four)
    pub fn similar_preview(&self) -> &[Movie] {
        let len = self.similar_movies.len().min(SIMILAR_PREVIEW_LEN);
        &self.similar_movies[..len]
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// Read-only picture of the backend catalog taken at bootstrap.
///
/// Refreshing replaces the whole snapshot; fields are never patched
/// individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub loaded: bool,
    pub total_movies: u64,
    pub total_ratings: u64,
    pub total_users: u64,
    /// Genre ids in server-provided order
    pub genres: Vec<GenreId>,
}

impl CatalogSnapshot {
    /// Snapshot published before bootstrap completes
    pub fn not_loaded() -> Self {
        Self::default()
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

// =============================================================================
// Algorithms
// =============================================================================

/// Backend recommendation algorithm, referenced by wire id only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Content,
    Collaborative,
    #[serde(rename = "popular", alias = "popularity")]
    Popularity,
    Hybrid,
    Manhattan,
    Euclidean,
    Pearson,
    Cosine,
}

impl Algorithm {
    /// The four pairwise similarity metrics
    pub const SIMILARITY_METRICS: [Algorithm; 4] = [
        Algorithm::Manhattan,
        Algorithm::Euclidean,
        Algorithm::Pearson,
        Algorithm::Cosine,
    ];

    /// Whole-catalog ranking methods
    pub const RANKING_METHODS: [Algorithm; 4] = [
        Algorithm::Content,
        Algorithm::Collaborative,
        Algorithm::Popularity,
        Algorithm::Hybrid,
    ];

    /// Identifier sent as the `method` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Content => "content",
            Algorithm::Collaborative => "collaborative",
            Algorithm::Popularity => "popular",
            Algorithm::Hybrid => "hybrid",
            Algorithm::Manhattan => "manhattan",
            Algorithm::Euclidean => "euclidean",
            Algorithm::Pearson => "pearson",
            Algorithm::Cosine => "cosine",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Content => "Content-based",
            Algorithm::Collaborative => "Collaborative",
            Algorithm::Popularity => "Popularity",
            Algorithm::Hybrid => "Hybrid",
            Algorithm::Manhattan => "Manhattan distance",
            Algorithm::Euclidean => "Euclidean distance",
            Algorithm::Pearson => "Pearson correlation",
            Algorithm::Cosine => "Cosine similarity",
        }
    }

    pub fn is_similarity_metric(&self) -> bool {
        Self::SIMILARITY_METRICS.contains(self)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(Algorithm::Content),
            "collaborative" => Ok(Algorithm::Collaborative),
            "popular" | "popularity" => Ok(Algorithm::Popularity),
            "hybrid" => Ok(Algorithm::Hybrid),
            "manhattan" => Ok(Algorithm::Manhattan),
            "euclidean" => Ok(Algorithm::Euclidean),
            "pearson" => Ok(Algorithm::Pearson),
            "cosine" => Ok(Algorithm::Cosine),
            _ => Err(CatalogError::UnknownAlgorithm(s.to_string())),
        }
    }
}
