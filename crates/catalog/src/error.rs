//! Error types for the catalog crate.

use thiserror::Error;

/// Errors raised while interpreting catalog identifiers and wire values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Mood identifier outside the closed mood set
    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    /// Algorithm identifier the backend does not expose
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// A wire field had a value we could not interpret
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
