//! Movie detail lookups.

use std::sync::Arc;

use api_client::{ApiClientError, CatalogApi};
use catalog::MovieDetail;
use tokio::sync::Mutex;
use tracing::{instrument, warn};

/// Fetches a movie's detail and remembers the last one shown.
///
/// A failed fetch leaves the previously shown detail in place.
pub struct MovieDetailFetcher {
    api: Arc<dyn CatalogApi>,
    current: Mutex<Option<MovieDetail>>,
}

impl MovieDetailFetcher {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            current: Mutex::new(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_detail(&self, movie_id: &str) -> Result<MovieDetail, ApiClientError> {
        match self.api.movie_detail(movie_id).await {
            Ok(detail) => {
                *self.current.lock().await = Some(detail.clone());
                Ok(detail)
            }
            Err(e) => {
                warn!("Failed to load detail for movie {}: {}", movie_id, e);
                Err(e)
            }
        }
    }

    /// Detail currently on display, if any
    pub async fn current(&self) -> Option<MovieDetail> {
        self.current.lock().await.clone()
    }

    pub async fn close(&self) {
        *self.current.lock().await = None;
    }
}
