//! Recommendation orchestrator.
//!
//! Turns a selection snapshot into exactly one backend call and wraps the
//! response as a [`RecommendationResult`]. Every call takes a sequence
//! number at issuance; when it completes, anything but the latest issued
//! request is reported as superseded instead of being displayed.
//!
//! Flow:
//! 1. Resolve the snapshot into a [`RequestPlan`] (pure, no I/O)
//! 2. Gate on the catalog snapshot being loaded
//! 3. Issue the single request, timing only the network call and decode
//! 4. Convert failures into an empty result with a failure description

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use api_client::{ApiClientError, CatalogApi, RecommendationEnvelope};
use catalog::{Algorithm, CatalogSnapshot, GenreId, MovieId, UserId};
use session::{RECOMMENDATION_LIMIT, RecommendationResult, Selection, SelectionError, SelectionSnapshot};
use tracing::{debug, info, instrument, warn};

/// The movie a movie-driven request is based on: the first one selected.
pub fn primary_movie(movie_ids: &[MovieId]) -> Option<&MovieId> {
    movie_ids.first()
}

/// Endpoint and parameters for one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPlan {
    /// `/recommendations/{movieId}`
    SimilarToMovie {
        movie_id: MovieId,
        algorithm: Algorithm,
        limit: usize,
    },
    /// `/genre-recommendations`, genres in selection order
    ByGenres {
        genre_ids: Vec<GenreId>,
        algorithm: Algorithm,
        limit: usize,
    },
    /// `/user-recommendations/{userId}`
    ForUser {
        user_id: UserId,
        algorithm: Algorithm,
        limit: usize,
    },
}

impl RequestPlan {
    /// Resolve which endpoint serves `snapshot`.
    ///
    /// Fails with `EmptySelection` before any request would be issued.
    pub fn resolve(snapshot: &SelectionSnapshot) -> Result<Self, SelectionError> {
        let algorithm = snapshot.algorithm;
        match &snapshot.selection {
            Selection::ByMovies { movie_ids } | Selection::ByMood { movie_ids, .. } => {
                let movie_id = primary_movie(movie_ids).ok_or(SelectionError::EmptySelection)?;
                Ok(RequestPlan::SimilarToMovie {
                    movie_id: movie_id.clone(),
                    algorithm,
                    limit: RECOMMENDATION_LIMIT,
                })
            }
            Selection::ByGenres { genre_ids } if !genre_ids.is_empty() => Ok(RequestPlan::ByGenres {
                genre_ids: genre_ids.clone(),
                algorithm,
                limit: RECOMMENDATION_LIMIT,
            }),
            Selection::ByUser {
                user_id: Some(user_id),
                limit,
            } => Ok(RequestPlan::ForUser {
                user_id: *user_id,
                algorithm,
                limit: *limit,
            }),
            _ => Err(SelectionError::EmptySelection),
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            RequestPlan::SimilarToMovie { .. } => "/recommendations/{movieId}",
            RequestPlan::ByGenres { .. } => "/genre-recommendations",
            RequestPlan::ForUser { .. } => "/user-recommendations/{userId}",
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            RequestPlan::SimilarToMovie { algorithm, .. }
            | RequestPlan::ByGenres { algorithm, .. }
            | RequestPlan::ForUser { algorithm, .. } => *algorithm,
        }
    }
}

/// What happened to one `run_recommendation` call
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    /// Latest request; display this result (it may carry a failure)
    Completed(RecommendationResult),
    /// A newer request was issued while this one was in flight
    Superseded { sequence: u64, latest: u64 },
}

impl RecommendationOutcome {
    pub fn result(&self) -> Option<&RecommendationResult> {
        match self {
            RecommendationOutcome::Completed(result) => Some(result),
            RecommendationOutcome::Superseded { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<RecommendationResult> {
        match self {
            RecommendationOutcome::Completed(result) => Some(result),
            RecommendationOutcome::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, RecommendationOutcome::Superseded { .. })
    }
}

/// Issues recommendation requests and discards out-of-order completions
pub struct RecommendationOrchestrator {
    api: Arc<dyn CatalogApi>,
    sequence: AtomicU64,
}

impl RecommendationOrchestrator {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            sequence: AtomicU64::new(0),
        }
    }

    /// Sequence number of the most recently issued request (0 before any)
    pub fn latest_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Run one recommendation request for `snapshot`.
    ///
    /// Only structural problems (nothing selected) are returned as `Err`.
    /// Network, status and decode failures, as well as an unloaded catalog,
    /// produce a `Completed` result with no movies and a failure set.
    #[instrument(skip_all, fields(algorithm = %snapshot.algorithm))]
    pub async fn run_recommendation(
        &self,
        snapshot: &SelectionSnapshot,
        catalog: &CatalogSnapshot,
    ) -> Result<RecommendationOutcome, SelectionError> {
        let plan = RequestPlan::resolve(snapshot)?;
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(sequence, endpoint = plan.endpoint(), "Issuing recommendation request");

        let result = if catalog.loaded {
            let start = Instant::now();
            let response = self.execute(&plan).await;
            let elapsed = start.elapsed();
            self.build_result(snapshot, &plan, sequence, elapsed, response)
        } else {
            warn!(sequence, "Recommendation requested before catalog was loaded");
            failed_result(
                snapshot,
                sequence,
                Duration::ZERO,
                SelectionError::CatalogNotLoaded.to_string(),
            )
        };

        let latest = self.latest_sequence();
        if sequence != latest {
            debug!(sequence, latest, "Discarding superseded recommendation result");
            return Ok(RecommendationOutcome::Superseded { sequence, latest });
        }

        Ok(RecommendationOutcome::Completed(result))
    }

    async fn execute(&self, plan: &RequestPlan) -> Result<RecommendationEnvelope, ApiClientError> {
        match plan {
            RequestPlan::SimilarToMovie {
                movie_id,
                algorithm,
                limit,
            } => self.api.movie_recommendations(movie_id, *algorithm, *limit).await,
            RequestPlan::ByGenres {
                genre_ids,
                algorithm,
                limit,
            } => self.api.genre_recommendations(genre_ids, *algorithm, *limit).await,
            RequestPlan::ForUser {
                user_id,
                algorithm,
                limit,
            } => self.api.user_recommendations(*user_id, *algorithm, *limit).await,
        }
    }

    fn build_result(
        &self,
        snapshot: &SelectionSnapshot,
        plan: &RequestPlan,
        sequence: u64,
        elapsed: Duration,
        response: Result<RecommendationEnvelope, ApiClientError>,
    ) -> RecommendationResult {
        match response {
            Ok(envelope) => {
                info!(
                    "Received {} recommendations from {} in {:.2?}",
                    envelope.recommendations.len(),
                    plan.endpoint(),
                    elapsed
                );
                RecommendationResult {
                    request_key: snapshot.clone(),
                    sequence,
                    ranked_movies: envelope.recommendations,
                    elapsed,
                    method: envelope
                        .method
                        .or_else(|| Some(plan.algorithm().as_str().to_string())),
                    explanation: envelope.explanation,
                    failure: None,
                }
            }
            Err(e) => {
                warn!("Recommendation request to {} failed after {:.2?}: {}", plan.endpoint(), elapsed, e);
                failed_result(snapshot, sequence, elapsed, e.to_string())
            }
        }
    }
}

fn failed_result(
    snapshot: &SelectionSnapshot,
    sequence: u64,
    elapsed: Duration,
    failure: String,
) -> RecommendationResult {
    RecommendationResult {
        request_key: snapshot.clone(),
        sequence,
        ranked_movies: Vec::new(),
        elapsed,
        method: None,
        explanation: None,
        failure: Some(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Mood;

    fn snapshot(selection: Selection, algorithm: Algorithm) -> SelectionSnapshot {
        SelectionSnapshot { selection, algorithm }
    }

    #[test]
    fn test_movies_use_first_selected_id() {
        let plan = RequestPlan::resolve(&snapshot(
            Selection::ByMovies {
                movie_ids: vec!["1".into(), "7".into(), "42".into()],
            },
            Algorithm::Cosine,
        ))
        .unwrap();

        assert_eq!(
            plan,
            RequestPlan::SimilarToMovie {
                movie_id: "1".into(),
                algorithm: Algorithm::Cosine,
                limit: 20
            }
        );
        assert_eq!(plan.endpoint(), "/recommendations/{movieId}");
    }

    #[test]
    fn test_mood_mode_resolves_like_movies() {
        let plan = RequestPlan::resolve(&snapshot(
            Selection::ByMood {
                mood: Mood::Suspenseful,
                movie_ids: vec!["9".into(), "3".into()],
            },
            Algorithm::Pearson,
        ))
        .unwrap();

        assert!(matches!(plan, RequestPlan::SimilarToMovie { ref movie_id, .. } if movie_id == "9"));
    }

    #[test]
    fn test_genres_keep_selection_order() {
        let plan = RequestPlan::resolve(&snapshot(
            Selection::ByGenres {
                genre_ids: vec!["Action".into(), "Comedy".into()],
            },
            Algorithm::Hybrid,
        ))
        .unwrap();

        match plan {
            RequestPlan::ByGenres {
                genre_ids, limit, ..
            } => {
                assert_eq!(genre_ids, vec!["Action", "Comedy"]);
                assert_eq!(limit, 20);
            }
            other => panic!("unexpected plan {other:?}"),
        }
    }

    #[test]
    fn test_user_plan_uses_chosen_limit() {
        let plan = RequestPlan::resolve(&snapshot(
            Selection::ByUser {
                user_id: Some(12),
                limit: 7,
            },
            Algorithm::Euclidean,
        ))
        .unwrap();

        assert_eq!(
            plan,
            RequestPlan::ForUser {
                user_id: 12,
                algorithm: Algorithm::Euclidean,
                limit: 7
            }
        );
    }

    #[test]
    fn test_empty_selections_are_rejected() {
        let empties = [
            Selection::Idle,
            Selection::ByMovies { movie_ids: vec![] },
            Selection::ByGenres { genre_ids: vec![] },
            Selection::ByUser {
                user_id: None,
                limit: 10,
            },
        ];
        for selection in empties {
            assert_eq!(
                RequestPlan::resolve(&snapshot(selection, Algorithm::Cosine)),
                Err(SelectionError::EmptySelection)
            );
        }
    }

    #[test]
    fn test_primary_movie() {
        assert_eq!(primary_movie(&[]), None);
        assert_eq!(primary_movie(&["5".to_string(), "6".to_string()]), Some(&"5".to_string()));
    }
}
