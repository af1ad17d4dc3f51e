//! Selection state machine.
//!
//! Owns the single state object of a discovery session: the active mode's
//! selection, the chosen algorithm, the preferred window size and the
//! currently displayed result. Every transition is synchronous; the only
//! asynchronous input is [`SelectionStateMachine::apply_result`], which
//! refuses results computed for a selection that has since changed.

use catalog::{Algorithm, GenreId, Mood, Movie, MovieId, UserId};
use tracing::debug;

use crate::error::{Result, SelectionError};
use crate::mode::{Mode, Phase, RECOMMENDATION_LIMIT, Selection, SelectionSnapshot};
use crate::window::{DEFAULT_WINDOW, RecommendationResult, ResultWindow};

#[derive(Debug, Clone)]
pub struct SelectionStateMachine {
    selection: Selection,
    algorithm: Algorithm,
    preferred_k: usize,
    window: Option<ResultWindow>,
}

impl Default for SelectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStateMachine {
    pub fn new() -> Self {
        Self {
            selection: Selection::Idle,
            algorithm: Algorithm::Hybrid,
            preferred_k: DEFAULT_WINDOW,
            window: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.selection.phase()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.selection.mode()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selection: self.selection.clone(),
            algorithm: self.algorithm,
        }
    }

    /// True when a recommendation request can be built from the selection
    pub fn can_calculate(&self) -> bool {
        self.phase() == Phase::Ready
    }

    /// Switch to `mode`, discarding the previous selection and result.
    ///
    /// Leaving a mode always passes through `Idle`; the algorithm survives
    /// only if the new mode allows it.
    pub fn enter_mode(&mut self, mode: Mode) {
        self.reset();
        self.selection = Selection::empty(mode);
        if !mode.allows(self.algorithm) {
            self.algorithm = mode.default_algorithm();
        }
        debug!(%mode, algorithm = %self.algorithm, "Entered mode");
    }

    /// Back to `Idle` with empty selection, no result and the default window.
    pub fn reset(&mut self) {
        self.selection = Selection::Idle;
        self.preferred_k = DEFAULT_WINDOW;
        self.window = None;
    }

    /// Add or remove a movie; returns whether it is now selected.
    pub fn toggle_movie(&mut self, movie_id: impl Into<MovieId>) -> Result<bool> {
        let phase = self.phase();
        let movie_ids = match &mut self.selection {
            Selection::ByMovies { movie_ids } | Selection::ByMood { movie_ids, .. } => movie_ids,
            _ => {
                return Err(SelectionError::WrongMode {
                    operation: "toggle movie",
                    phase,
                });
            }
        };
        Ok(toggle(movie_ids, movie_id.into()))
    }

    /// Add or remove a genre; returns whether it is now selected.
    pub fn toggle_genre(&mut self, genre_id: impl Into<GenreId>) -> Result<bool> {
        let phase = self.phase();
        match &mut self.selection {
            Selection::ByGenres { genre_ids } => Ok(toggle(genre_ids, genre_id.into())),
            _ => Err(SelectionError::WrongMode {
                operation: "toggle genre",
                phase,
            }),
        }
    }

    /// Enter mood mode with `mood` already chosen.
    pub fn enter_mood(&mut self, mood: Mood) {
        self.enter_mode(Mode::ByMood);
        self.selection = Selection::ByMood {
            mood,
            movie_ids: Vec::new(),
        };
    }

    /// Change the mood. Candidates and picked movies are left as they are.
    pub fn set_mood(&mut self, new_mood: Mood) -> Result<()> {
        let phase = self.phase();
        match &mut self.selection {
            Selection::ByMood { mood, .. } => {
                *mood = new_mood;
                Ok(())
            }
            _ => Err(SelectionError::WrongMode {
                operation: "set mood",
                phase,
            }),
        }
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> Result<()> {
        if let Some(mode) = self.mode() {
            if !mode.allows(algorithm) {
                return Err(SelectionError::AlgorithmNotAllowed { algorithm, mode });
            }
        }
        self.algorithm = algorithm;
        Ok(())
    }

    pub fn set_user(&mut self, user: UserId) -> Result<()> {
        let phase = self.phase();
        match &mut self.selection {
            Selection::ByUser { user_id, .. } => {
                *user_id = Some(user);
                Ok(())
            }
            _ => Err(SelectionError::WrongMode {
                operation: "set user",
                phase,
            }),
        }
    }

    /// Set N for user recommendations, clamped to `[1, 20]`.
    pub fn set_user_limit(&mut self, n: usize) -> Result<usize> {
        let phase = self.phase();
        match &mut self.selection {
            Selection::ByUser { limit, .. } => {
                *limit = n.clamp(1, RECOMMENDATION_LIMIT);
                Ok(*limit)
            }
            _ => Err(SelectionError::WrongMode {
                operation: "set user limit",
                phase,
            }),
        }
    }

    /// Install `result` only if it is the latest issued request and was
    /// computed for the live selection.
    pub fn apply_if_latest(&mut self, result: RecommendationResult, latest_sequence: u64) -> bool {
        if result.sequence != latest_sequence {
            debug!(
                sequence = result.sequence,
                latest = latest_sequence,
                "Dropping result superseded by a newer request"
            );
            return false;
        }
        self.apply_result(result)
    }

    /// Install `result` if it was computed for the live selection.
    ///
    /// Returns `false` and leaves the state untouched otherwise.
    pub fn apply_result(&mut self, result: RecommendationResult) -> bool {
        if result.request_key != self.snapshot() {
            debug!(sequence = result.sequence, "Dropping result for outdated selection");
            return false;
        }
        self.window = Some(ResultWindow::new(result, self.preferred_k));
        true
    }

    /// Remember `k` and re-slice the current result; returns the effective K.
    pub fn set_window(&mut self, k: usize) -> usize {
        self.preferred_k = k;
        match &mut self.window {
            Some(window) => window.set_k(k),
            None => k,
        }
    }

    pub fn preferred_window(&self) -> usize {
        self.preferred_k
    }

    pub fn window(&self) -> Option<&ResultWindow> {
        self.window.as_ref()
    }

    /// Movies currently on screen
    pub fn visible(&self) -> &[Movie] {
        self.window.as_ref().map(ResultWindow::visible).unwrap_or(&[])
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if let Some(pos) = items.iter().position(|existing| *existing == item) {
        items.remove(pos);
        false
    } else {
        items.push(item);
        true
    }
}
