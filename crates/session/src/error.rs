//! Error types for selection-state transitions.

use catalog::Algorithm;
use thiserror::Error;

use crate::mode::{Mode, Phase};

/// Structural misuse of the selection state machine.
///
/// None of these are fatal: the state is left exactly as it was before the
/// rejected operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Operation belongs to a different mode than the active one
    #[error("{operation} is not available while {phase}")]
    WrongMode { operation: &'static str, phase: Phase },

    #[error("Algorithm {algorithm} cannot be used in {mode} mode")]
    AlgorithmNotAllowed { algorithm: Algorithm, mode: Mode },

    /// Calculate requested before anything was picked
    #[error("Nothing selected to recommend from")]
    EmptySelection,

    /// Recommendations requested before bootstrap published a snapshot
    #[error("Catalog is not loaded yet")]
    CatalogNotLoaded,

    #[error("Genre {0} is not part of the catalog")]
    UnknownGenre(String),
}

pub type Result<T> = std::result::Result<T, SelectionError>;
