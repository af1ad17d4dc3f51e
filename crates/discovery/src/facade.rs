//! Discovery session façade.
//!
//! Wires bootstrap, the selection state machine, candidate loading, the
//! recommendation orchestrator and the detail fetcher behind one handle
//! that can be shared across tasks.

use std::sync::Arc;

use api_client::{ApiClientError, CatalogApi};
use catalog::{Algorithm, CatalogSnapshot, GenreId, Mood, Movie, MovieDetail, MovieId, UserId};
use session::{Mode, Phase, RecommendationResult, ResultWindow, Selection, SelectionError, SelectionStateMachine};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::bootstrap::{BootstrapError, SystemBootstrap};
use crate::candidates::{CANDIDATE_LIMIT, CandidateLoader};
use crate::detail::MovieDetailFetcher;
use crate::orchestrator::{RecommendationOrchestrator, RecommendationOutcome};

/// Candidate listing tagged with the reload that produced it
#[derive(Default)]
struct CandidateList {
    generation: u64,
    movies: Vec<Movie>,
}

pub struct DiscoverySession {
    bootstrap: SystemBootstrap,
    orchestrator: RecommendationOrchestrator,
    candidates: CandidateLoader,
    details: MovieDetailFetcher,
    catalog: RwLock<CatalogSnapshot>,
    state: Mutex<SelectionStateMachine>,
    candidate_list: Mutex<CandidateList>,
}

impl DiscoverySession {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            bootstrap: SystemBootstrap::new(api.clone()),
            orchestrator: RecommendationOrchestrator::new(api.clone()),
            candidates: CandidateLoader::new(api.clone()),
            details: MovieDetailFetcher::new(api),
            catalog: RwLock::new(CatalogSnapshot::not_loaded()),
            state: Mutex::new(SelectionStateMachine::new()),
            candidate_list: Mutex::new(CandidateList::default()),
        }
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Run bootstrap and publish the snapshot on success.
    pub async fn initialize(&self) -> Result<CatalogSnapshot, BootstrapError> {
        let snapshot = self.bootstrap.initialize().await?;
        *self.catalog.write().await = snapshot.clone();
        Ok(snapshot)
    }

    /// Re-run bootstrap; the previous snapshot stays if it fails.
    pub async fn refresh(&self) -> Result<CatalogSnapshot, BootstrapError> {
        match self.initialize().await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!("Catalog refresh failed, keeping previous snapshot: {}", e);
                Err(e)
            }
        }
    }

    pub async fn catalog(&self) -> CatalogSnapshot {
        self.catalog.read().await.clone()
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase()
    }

    pub async fn mode(&self) -> Option<Mode> {
        self.state.lock().await.mode()
    }

    pub async fn selection(&self) -> Selection {
        self.state.lock().await.selection().clone()
    }

    pub async fn algorithm(&self) -> Algorithm {
        self.state.lock().await.algorithm()
    }

    /// Enter `mode` from a clean slate and load its candidates.
    ///
    /// Movie and mood modes list movies to pick from; genre mode picks from
    /// the catalog's genre list and user mode needs no candidates.
    pub async fn enter_mode(&self, mode: Mode) -> Vec<Movie> {
        {
            let mut state = self.state.lock().await;
            state.enter_mode(mode);
            self.invalidate_candidates().await;
        }
        self.reload_candidates().await
    }

    /// Enter mood mode with `mood` already chosen and load its candidates.
    pub async fn enter_mood_mode(&self, mood: Mood) -> Vec<Movie> {
        {
            let mut state = self.state.lock().await;
            state.enter_mood(mood);
            self.invalidate_candidates().await;
        }
        self.reload_candidates().await
    }

    /// Change the mood without fetching anything.
    ///
    /// The candidate listing stays until [`Self::reload_candidates`] or
    /// [`Self::enter_mood_mode`] is called.
    pub async fn set_mood(&self, mood: Mood) -> Result<(), SelectionError> {
        self.state.lock().await.set_mood(mood)
    }

    /// Fetch the candidate listing for the active mode again.
    ///
    /// A failed listing is logged and yields no candidates. A listing that
    /// completes after a newer reload, a mode change or a reset is dropped
    /// and the current candidates are returned instead.
    #[instrument(skip(self))]
    pub async fn reload_candidates(&self) -> Vec<Movie> {
        let (mode, mood, generation) = {
            let state = self.state.lock().await;
            let mut list = self.candidate_list.lock().await;
            list.generation += 1;
            (state.mode(), state.selection().mood(), list.generation)
        };

        let loaded = match mode {
            Some(Mode::ByMovies) => self.candidates.browse(CANDIDATE_LIMIT).await,
            Some(Mode::ByMood) => self.candidates.for_mood(mood, CANDIDATE_LIMIT).await,
            _ => Ok(Vec::new()),
        };

        let movies = loaded.unwrap_or_else(|e| {
            warn!("Failed to load candidates: {}", e);
            Vec::new()
        });

        let mut list = self.candidate_list.lock().await;
        if list.generation != generation {
            debug!(generation, latest = list.generation, "Dropping outdated candidate listing");
            return list.movies.clone();
        }
        list.movies = movies.clone();
        movies
    }

    pub async fn candidates(&self) -> Vec<Movie> {
        self.candidate_list.lock().await.movies.clone()
    }

    /// Clear the listing and orphan any reload still in flight.
    ///
    /// Called with the state lock held so no reload can observe the new
    /// state before its listing is invalidated.
    async fn invalidate_candidates(&self) {
        let mut list = self.candidate_list.lock().await;
        list.generation += 1;
        list.movies.clear();
    }

    pub async fn toggle_movie(&self, movie_id: impl Into<MovieId>) -> Result<bool, SelectionError> {
        self.state.lock().await.toggle_movie(movie_id)
    }

    /// Toggle a genre, checking it against the loaded catalog.
    pub async fn toggle_genre(&self, genre_id: impl Into<GenreId>) -> Result<bool, SelectionError> {
        let genre_id = genre_id.into();
        {
            let catalog = self.catalog.read().await;
            if catalog.loaded && !catalog.has_genre(&genre_id) {
                return Err(SelectionError::UnknownGenre(genre_id));
            }
        }
        self.state.lock().await.toggle_genre(genre_id)
    }

    pub async fn set_algorithm(&self, algorithm: Algorithm) -> Result<(), SelectionError> {
        self.state.lock().await.set_algorithm(algorithm)
    }

    pub async fn set_user(&self, user_id: UserId) -> Result<(), SelectionError> {
        self.state.lock().await.set_user(user_id)
    }

    pub async fn set_user_limit(&self, n: usize) -> Result<usize, SelectionError> {
        self.state.lock().await.set_user_limit(n)
    }

    /// Back to idle: selection, result, window and candidates all cleared.
    pub async fn reset(&self) {
        {
            let mut state = self.state.lock().await;
            state.reset();
            self.invalidate_candidates().await;
        }
        self.details.close().await;
    }

    // ========================================================================
    // Recommendations
    // ========================================================================

    /// Whether calculate would issue a request right now
    pub async fn can_calculate(&self) -> bool {
        let loaded = self.catalog.read().await.loaded;
        loaded && self.state.lock().await.can_calculate()
    }

    /// Request recommendations for the current selection.
    ///
    /// The result is installed only if it is the latest issued request and
    /// the selection has not changed while it was in flight; otherwise the
    /// outcome is `Superseded` and the displayed result is untouched.
    pub async fn calculate(&self) -> Result<RecommendationOutcome, SelectionError> {
        let snapshot = self.state.lock().await.snapshot();
        let catalog = self.catalog().await;

        let outcome = self.orchestrator.run_recommendation(&snapshot, &catalog).await?;
        let RecommendationOutcome::Completed(result) = outcome else {
            return Ok(outcome);
        };

        let mut state = self.state.lock().await;
        let latest = self.orchestrator.latest_sequence();
        if !state.apply_if_latest(result.clone(), latest) {
            return Ok(RecommendationOutcome::Superseded {
                sequence: result.sequence,
                latest,
            });
        }

        info!(
            sequence = result.sequence,
            count = result.ranked_movies.len(),
            "Displaying recommendations"
        );
        Ok(RecommendationOutcome::Completed(result))
    }

    /// Change K and re-slice the displayed result; returns the effective K.
    pub async fn set_window(&self, k: usize) -> usize {
        self.state.lock().await.set_window(k)
    }

    pub async fn visible(&self) -> Vec<Movie> {
        self.state.lock().await.visible().to_vec()
    }

    pub async fn window(&self) -> Option<ResultWindow> {
        self.state.lock().await.window().cloned()
    }

    pub async fn current_result(&self) -> Option<RecommendationResult> {
        self.state.lock().await.window().map(|w| w.result().clone())
    }

    // ========================================================================
    // Detail
    // ========================================================================

    pub async fn fetch_detail(&self, movie_id: &str) -> Result<MovieDetail, ApiClientError> {
        self.details.fetch_detail(movie_id).await
    }

    pub async fn current_detail(&self) -> Option<MovieDetail> {
        self.details.current().await
    }
}
