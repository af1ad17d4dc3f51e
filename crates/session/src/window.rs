//! Client-side top-K window over an already-fetched ranked list.
//!
//! Re-slicing is pure: changing K never touches the network and never
//! reorders the ranked list. The visible slice is always a prefix.

use std::time::Duration;

use catalog::Movie;

use crate::mode::SelectionSnapshot;

/// Largest K the window accepts
pub const MAX_WINDOW: usize = 20;

/// K shown for a fresh session
pub const DEFAULT_WINDOW: usize = 10;

/// Clamp `k` to `[1, min(MAX_WINDOW, len)]`.
///
/// An empty list has no valid K; the window is then 0.
pub fn clamp_window(k: usize, len: usize) -> usize {
    let upper = len.min(MAX_WINDOW);
    if upper == 0 { 0 } else { k.clamp(1, upper) }
}

/// Prefix of `ranked` of length `clamp_window(k, ranked.len())`
pub fn visible<T>(ranked: &[T], k: usize) -> &[T] {
    &ranked[..clamp_window(k, ranked.len())]
}

/// Outcome of one orchestrated recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    /// Mode + selection + algorithm that produced this result
    pub request_key: SelectionSnapshot,
    /// Issuance number of the request
    pub sequence: u64,
    /// Server rank order, never reordered client-side
    pub ranked_movies: Vec<Movie>,
    /// Wall-clock of the single network call, telemetry only
    pub elapsed: Duration,
    pub method: Option<String>,
    pub explanation: Option<String>,
    /// Set when the request failed; `ranked_movies` is then empty
    pub failure: Option<String>,
}

impl RecommendationResult {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// A result together with the user's current K
#[derive(Debug, Clone, PartialEq)]
pub struct ResultWindow {
    result: RecommendationResult,
    k: usize,
}

impl ResultWindow {
    pub fn new(result: RecommendationResult, requested_k: usize) -> Self {
        let k = clamp_window(requested_k, result.ranked_movies.len());
        Self { result, k }
    }

    /// Change K; returns the effective (clamped) value
    pub fn set_k(&mut self, k: usize) -> usize {
        self.k = clamp_window(k, self.result.ranked_movies.len());
        self.k
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Largest K the current list supports
    pub fn max_k(&self) -> usize {
        self.result.ranked_movies.len().min(MAX_WINDOW)
    }

    pub fn visible(&self) -> &[Movie] {
        visible(&self.result.ranked_movies, self.k)
    }

    pub fn result(&self) -> &RecommendationResult {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Selection;
    use catalog::Algorithm;

    fn ranked(n: usize) -> Vec<Movie> {
        (1..=n)
            .map(|i| Movie::new(i.to_string(), format!("Movie {i}"), vec!["Drama".into()]))
            .collect()
    }

    fn result_with(n: usize) -> RecommendationResult {
        RecommendationResult {
            request_key: SelectionSnapshot {
                selection: Selection::ByGenres {
                    genre_ids: vec!["Drama".into()],
                },
                algorithm: Algorithm::Hybrid,
            },
            sequence: 1,
            ranked_movies: ranked(n),
            elapsed: Duration::from_millis(120),
            method: None,
            explanation: None,
            failure: None,
        }
    }

    #[test]
    fn test_clamp_window_bounds() {
        assert_eq!(clamp_window(0, 17), 1);
        assert_eq!(clamp_window(5, 17), 5);
        assert_eq!(clamp_window(20, 17), 17);
        assert_eq!(clamp_window(50, 40), MAX_WINDOW);
        assert_eq!(clamp_window(10, 0), 0);
    }

    #[test]
    fn test_prefix_law() {
        let list: Vec<u32> = (0..30).collect();
        for k in 1..=MAX_WINDOW {
            let slice = visible(&list, k);
            assert_eq!(slice.len(), k);
            assert_eq!(slice, &list[..k]);
            // Idempotent
            assert_eq!(slice, visible(&list, k));
        }
    }

    #[test]
    fn test_window_on_seventeen_results() {
        let mut window = ResultWindow::new(result_with(17), DEFAULT_WINDOW);
        assert_eq!(window.k(), 10);

        assert_eq!(window.set_k(5), 5);
        assert_eq!(window.visible().len(), 5);

        assert_eq!(window.set_k(20), 17);
        assert_eq!(window.visible().len(), 17);
        assert_eq!(window.max_k(), 17);
    }

    #[test]
    fn test_resizing_never_reorders() {
        let mut window = ResultWindow::new(result_with(12), 3);
        let before: Vec<_> = window.result().ranked_movies.clone();
        window.set_k(12);
        window.set_k(1);
        assert_eq!(window.result().ranked_movies, before);
        assert_eq!(window.visible()[0].movie_id, "1");
    }

    #[test]
    fn test_empty_result_window() {
        let mut window = ResultWindow::new(result_with(0), DEFAULT_WINDOW);
        assert_eq!(window.k(), 0);
        assert_eq!(window.set_k(7), 0);
        assert!(window.visible().is_empty());
    }

    #[test]
    fn test_elapsed_seconds() {
        let result = result_with(1);
        assert!((result.elapsed_seconds() - 0.12).abs() < 1e-9);
        assert!(!result.is_failure());
    }
}
