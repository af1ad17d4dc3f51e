//! Client for the movie recommendation backend.
//!
//! This crate provides a typed Rust client for the backend's JSON-over-HTTP
//! API. It handles:
//! - Building percent-encoded endpoint URLs under a configurable base path
//! - Decoding the backend's loosely typed documents into catalog types
//! - Mapping transport, status and decode failures onto [`ApiClientError`]
//!
//! The [`CatalogApi`] trait is the seam the discovery layer programs
//! against; [`HttpCatalogClient`] is the reqwest-backed implementation.
//! Calls are issued exactly once and never retried.

pub mod client;
pub mod config;
pub mod error;
pub mod responses;
pub mod search;

pub use client::{CatalogApi, HttpCatalogClient};
pub use config::ApiConfig;
pub use error::{ApiClientError, Result};
pub use responses::{
    DatabaseCounts, GenreEntry, HealthStatus, InitConfirmation, MethodCatalog, MethodDetail,
    RecommendationEnvelope, SimilarityComparison, SimilarityReport, StatsResponse,
};
pub use search::{SearchQuery, DEFAULT_LISTING_LIMIT};
