//! Startup sequence: health, conditional init, stats, genre list.

use std::sync::Arc;
use std::time::Instant;

use api_client::{ApiClientError, CatalogApi};
use catalog::CatalogSnapshot;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// A startup call failed; no snapshot is published.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BootstrapError {
    #[error("Health check failed: {0}")]
    Health(ApiClientError),

    #[error("Backend initialization failed: {0}")]
    Init(ApiClientError),

    #[error("Failed to load catalog statistics: {0}")]
    Stats(ApiClientError),

    #[error("Failed to load genre list: {0}")]
    Genres(ApiClientError),
}

impl BootstrapError {
    pub fn api_error(&self) -> &ApiClientError {
        match self {
            BootstrapError::Health(e)
            | BootstrapError::Init(e)
            | BootstrapError::Stats(e)
            | BootstrapError::Genres(e) => e,
        }
    }
}

/// Brings the backend up and reads the catalog-level facts.
pub struct SystemBootstrap {
    api: Arc<dyn CatalogApi>,
}

impl SystemBootstrap {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    /// Run the startup calls in order and build a loaded snapshot.
    ///
    /// `/init` is issued once, and only when health reports the backend as
    /// not yet initialized.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<CatalogSnapshot, BootstrapError> {
        let start = Instant::now();

        let health = self.api.health().await.map_err(BootstrapError::Health)?;
        if !health.initialized {
            warn!("Backend not initialized, requesting /init");
            let confirmation = self.api.init().await.map_err(BootstrapError::Init)?;
            info!(
                status = confirmation.status.as_deref().unwrap_or("unknown"),
                "Backend initialized"
            );
        }

        let stats = self.api.stats().await.map_err(BootstrapError::Stats)?;
        let genres = self.api.genres().await.map_err(BootstrapError::Genres)?;

        let snapshot = CatalogSnapshot {
            loaded: true,
            total_movies: stats.database.movies,
            total_ratings: stats.database.ratings,
            total_users: stats.database.users,
            genres: genres.into_iter().map(|entry| entry.genre).collect(),
        };

        info!(
            "Catalog loaded in {:.2?}: {} movies, {} ratings, {} users, {} genres",
            start.elapsed(),
            snapshot.total_movies,
            snapshot.total_ratings,
            snapshot.total_users,
            snapshot.genres.len()
        );

        Ok(snapshot)
    }
}
