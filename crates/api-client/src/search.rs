//! Query parameters for the browse/search listing (`GET /search`).

use catalog::GenreId;

/// Default page size of the backend listing endpoints
pub const DEFAULT_LISTING_LIMIT: usize = 20;

/// Browse or filtered search over the catalog.
///
/// With no filters set the backend answers with its random/popular browse
/// listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub genre: Option<GenreId>,
    pub year: Option<u16>,
    pub min_rating: Option<f64>,
    pub limit: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::browse(DEFAULT_LISTING_LIMIT)
    }
}

impl SearchQuery {
    /// Unfiltered listing of `limit` movies
    pub fn browse(limit: usize) -> Self {
        Self {
            text: None,
            genre: None,
            year: None,
            min_rating: None,
            limit,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.trim().is_empty()).then_some(text);
        self
    }

    pub fn with_genre(mut self, genre: impl Into<GenreId>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn is_browse(&self) -> bool {
        self.text.is_none() && self.genre.is_none() && self.year.is_none() && self.min_rating.is_none()
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if let Some(text) = &self.text {
            pairs.push(("q", text.clone()));
        }
        if let Some(genre) = &self.genre {
            pairs.push(("genre", genre.clone()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(rating) = self.min_rating {
            pairs.push(("rating", rating.to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}
