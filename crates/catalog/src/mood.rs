//! Mood selectors and the static mood → genre table.
//!
//! A mood narrows the candidate genre set before browsing. The table is
//! fixed at compile time, so `genres_for` is a pure lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};

/// Coarse emotional-state selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Sentinel: no genre narrowing, plain browse
    #[default]
    Any,
    Cheerful,
    Reflective,
    Exciting,
    Relaxed,
    Suspenseful,
    Intellectual,
}

// Genres are listed in the order the genre → mood table declares them.
const CHEERFUL: &[&str] = &["Comedy", "Romance", "Animation", "Family", "Musical", "Adventure", "Fantasy"];
const REFLECTIVE: &[&str] = &[
    "Drama",
    "War",
    "Documentary",
    "Biography",
    "History",
    "Crime",
    "Western",
    "Film-Noir",
];
const EXCITING: &[&str] = &["Action", "Adventure", "Sci-Fi", "Fantasy", "Thriller", "Western"];
const RELAXED: &[&str] = &["Romance", "Animation", "Family"];
const SUSPENSEFUL: &[&str] = &["Thriller", "Mystery", "Crime", "Horror"];
const INTELLECTUAL: &[&str] = &[
    "Drama",
    "War",
    "Documentary",
    "Biography",
    "History",
    "Sci-Fi",
    "Mystery",
    "Film-Noir",
];

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Any,
        Mood::Cheerful,
        Mood::Reflective,
        Mood::Exciting,
        Mood::Relaxed,
        Mood::Suspenseful,
        Mood::Intellectual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Any => "any",
            Mood::Cheerful => "cheerful",
            Mood::Reflective => "reflective",
            Mood::Exciting => "exciting",
            Mood::Relaxed => "relaxed",
            Mood::Suspenseful => "suspenseful",
            Mood::Intellectual => "intellectual",
        }
    }

    /// Ordered genre ids associated with this mood.
    ///
    /// `Mood::Any` maps to an empty slice; callers fall back to an
    /// unfiltered browse.
    pub fn genres_for(&self) -> &'static [&'static str] {
        match self {
            Mood::Any => &[],
            Mood::Cheerful => CHEERFUL,
            Mood::Reflective => REFLECTIVE,
            Mood::Exciting => EXCITING,
            Mood::Relaxed => RELAXED,
            Mood::Suspenseful => SUSPENSEFUL,
            Mood::Intellectual => INTELLECTUAL,
        }
    }

    /// The single genre used for the mood's candidate listing.
    ///
    /// Only the first mapped genre is queried; the rest of the mapping is
    /// informational.
    pub fn primary_genre(&self) -> Option<&'static str> {
        self.genres_for().first().copied()
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == wanted)
            .ok_or_else(|| CatalogError::UnknownMood(s.to_string()))
    }
}
