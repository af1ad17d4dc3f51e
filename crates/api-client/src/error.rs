//! Errors that can occur when talking to the recommendation backend.

use thiserror::Error;

/// Errors that can occur when interacting with the recommendation backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiClientError {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Connection, DNS, timeout or body transfer failure
    #[error("Request to {endpoint} failed: {reason}")]
    Transport {
        endpoint: String,
        reason: String,
        timed_out: bool,
    },

    /// Backend answered with a non-success status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Body could not be decoded into the expected shape
    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

impl ApiClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiClientError::Transport { timed_out: true, .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiClientError::Status { status: 404, .. })
    }

    /// Endpoint template the failure relates to, when known
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ApiClientError::Transport { endpoint, .. }
            | ApiClientError::Status { endpoint, .. }
            | ApiClientError::InvalidResponse { endpoint, .. } => Some(endpoint),
            ApiClientError::InvalidBaseUrl { .. } | ApiClientError::ClientBuild(_) => None,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ApiClientError>;
