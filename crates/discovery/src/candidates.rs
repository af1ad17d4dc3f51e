//! Candidate listings the user picks movies from.

use std::sync::Arc;

use api_client::{ApiClientError, CatalogApi, SearchQuery};
use catalog::{Mood, Movie};
use tracing::{debug, instrument, warn};

/// Number of candidates shown in movie and mood modes
pub const CANDIDATE_LIMIT: usize = 10;

pub struct CandidateLoader {
    api: Arc<dyn CatalogApi>,
}

impl CandidateLoader {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    /// Unfiltered random/popular browse
    #[instrument(skip(self))]
    pub async fn browse(&self, limit: usize) -> Result<Vec<Movie>, ApiClientError> {
        self.api.search(&SearchQuery::browse(limit)).await
    }

    /// Candidates for `mood`, listed from its primary genre only.
    ///
    /// `Mood::Any`, or a failed genre listing, falls back to [`Self::browse`].
    #[instrument(skip(self))]
    pub async fn for_mood(&self, mood: Mood, limit: usize) -> Result<Vec<Movie>, ApiClientError> {
        let Some(genre) = mood.primary_genre() else {
            return self.browse(limit).await;
        };

        match self.api.movies_by_genre(genre, limit).await {
            Ok(movies) => {
                debug!(genre, count = movies.len(), "Loaded mood candidates");
                Ok(movies)
            }
            Err(e) => {
                warn!(genre, "Genre listing failed, falling back to browse: {}", e);
                self.browse(limit).await
            }
        }
    }
}
