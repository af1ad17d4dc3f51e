//! Discovery modes and the per-mode selection they carry.

use std::fmt;

use catalog::{Algorithm, GenreId, Mood, MovieId, UserId};

/// Upper bound on ranked results requested from the backend
pub const RECOMMENDATION_LIMIT: usize = 20;

/// Default N for user-based recommendations
pub const DEFAULT_USER_LIMIT: usize = 10;

/// Top-level discovery strategy picked by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    ByMovies,
    ByGenres,
    ByMood,
    ByUser,
}

impl Mode {
    /// Whether `algorithm` may drive a request in this mode.
    ///
    /// Genre requests accept every ranking method and similarity metric;
    /// movie, mood and user requests accept similarity metrics only.
    pub fn allows(&self, algorithm: Algorithm) -> bool {
        match self {
            Mode::ByGenres => true,
            Mode::ByMovies | Mode::ByMood | Mode::ByUser => algorithm.is_similarity_metric(),
        }
    }

    /// Algorithm selected on entry when the previous choice is not allowed
    pub fn default_algorithm(&self) -> Algorithm {
        match self {
            Mode::ByGenres => Algorithm::Hybrid,
            Mode::ByMovies | Mode::ByMood | Mode::ByUser => Algorithm::Cosine,
        }
    }

    pub fn allowed_algorithms(&self) -> Vec<Algorithm> {
        Algorithm::RANKING_METHODS
            .into_iter()
            .chain(Algorithm::SIMILARITY_METRICS)
            .filter(|alg| self.allows(*alg))
            .collect()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::ByMovies => "by-movies",
            Mode::ByGenres => "by-genres",
            Mode::ByMood => "by-mood",
            Mode::ByUser => "by-user",
        };
        f.write_str(name)
    }
}

/// Coarse state of the selection flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PickingMovies,
    PickingGenres,
    PickingMood,
    PickingUser,
    /// Selection non-empty, awaiting calculate
    Ready,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::PickingMovies => "picking movies",
            Phase::PickingGenres => "picking genres",
            Phase::PickingMood => "picking a mood",
            Phase::PickingUser => "picking a user",
            Phase::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Mode-specific selection, one variant per mode
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    Idle,
    /// Movie ids in click order
    ByMovies { movie_ids: Vec<MovieId> },
    /// Genre ids in click order
    ByGenres { genre_ids: Vec<GenreId> },
    /// Mood used for the candidate listing plus movies picked from it
    ByMood { mood: Mood, movie_ids: Vec<MovieId> },
    ByUser { user_id: Option<UserId>, limit: usize },
}

impl Selection {
    /// Fresh, empty selection for `mode`
    pub fn empty(mode: Mode) -> Self {
        match mode {
            Mode::ByMovies => Selection::ByMovies { movie_ids: Vec::new() },
            Mode::ByGenres => Selection::ByGenres { genre_ids: Vec::new() },
            Mode::ByMood => Selection::ByMood {
                mood: Mood::Any,
                movie_ids: Vec::new(),
            },
            Mode::ByUser => Selection::ByUser {
                user_id: None,
                limit: DEFAULT_USER_LIMIT,
            },
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            Selection::Idle => None,
            Selection::ByMovies { .. } => Some(Mode::ByMovies),
            Selection::ByGenres { .. } => Some(Mode::ByGenres),
            Selection::ByMood { .. } => Some(Mode::ByMood),
            Selection::ByUser { .. } => Some(Mode::ByUser),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Selection::Idle => Phase::Idle,
            Selection::ByMovies { movie_ids } if movie_ids.is_empty() => Phase::PickingMovies,
            Selection::ByGenres { genre_ids } if genre_ids.is_empty() => Phase::PickingGenres,
            Selection::ByMood { movie_ids, .. } if movie_ids.is_empty() => Phase::PickingMood,
            Selection::ByUser { user_id: None, .. } => Phase::PickingUser,
            _ => Phase::Ready,
        }
    }

    /// Selected movie ids (empty outside movie-driven modes)
    pub fn movie_ids(&self) -> &[MovieId] {
        match self {
            Selection::ByMovies { movie_ids } | Selection::ByMood { movie_ids, .. } => movie_ids,
            _ => &[],
        }
    }

    /// Selected genre ids (empty outside genre mode)
    pub fn genre_ids(&self) -> &[GenreId] {
        match self {
            Selection::ByGenres { genre_ids } => genre_ids,
            _ => &[],
        }
    }

    /// Current mood; `Mood::Any` outside mood mode
    pub fn mood(&self) -> Mood {
        match self {
            Selection::ByMood { mood, .. } => *mood,
            _ => Mood::Any,
        }
    }
}

/// Immutable copy of mode + selection + algorithm.
///
/// Doubles as the request key of a recommendation: a result is only shown
/// while the live snapshot still equals the one it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub selection: Selection,
    pub algorithm: Algorithm,
}

impl SelectionSnapshot {
    pub fn mode(&self) -> Option<Mode> {
        self.selection.mode()
    }
}
