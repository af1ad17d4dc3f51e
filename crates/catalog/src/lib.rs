//! # Catalog Crate
//!
//! Value types for the ReelDiscover client: movies as served by the
//! recommendation backend, the catalog snapshot built at bootstrap, the
//! algorithm identifiers the backend understands, and the mood → genre table.
//!
//! ## Main Components
//!
//! - **types**: Movie, MovieDetail, CatalogSnapshot, Algorithm
//! - **mood**: Mood selector and its genre mapping
//! - **wire**: lenient decoding of backend JSON (ids, pipe-delimited genres)
//! - **error**: Error types for identifier parsing
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{Movie, Mood};
//!
//! let movie: Movie = serde_json::from_str(r#"{"movieId": 1, "title": "Toy Story (1995)", "genres": "Animation|Comedy"}"#)?;
//! assert_eq!(movie.genres, vec!["Animation", "Comedy"]);
//! assert_eq!(Mood::Suspenseful.primary_genre(), Some("Thriller"));
//! ```

pub mod error;
pub mod mood;
pub mod types;
pub mod wire;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use mood::Mood;
pub use types::{
    // Type aliases
    GenreId,
    MovieId,
    UserId,
    // Core types
    Algorithm,
    CatalogSnapshot,
    Movie,
    MovieDetail,
    RatingStats,
    SIMILAR_PREVIEW_LEN,
};
