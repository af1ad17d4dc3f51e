//! In-memory `CatalogApi` used by the discovery tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use api_client::{
    ApiClientError, CatalogApi, DatabaseCounts, GenreEntry, HealthStatus, InitConfirmation,
    MethodCatalog, RecommendationEnvelope, SearchQuery, SimilarityReport, StatsResponse,
};
use async_trait::async_trait;
use catalog::{Algorithm, GenreId, Movie, MovieDetail, UserId};
use tokio::sync::Notify;

pub const GENRES: [&str; 6] = ["Action", "Comedy", "Crime", "Drama", "Thriller", "Sci-Fi"];

/// Records calls as `"<endpoint> <args>"` strings and answers from memory.
#[derive(Default)]
pub struct FakeCatalog {
    pub initialized: bool,
    pub calls: Mutex<Vec<String>>,
    pub fail_endpoints: Mutex<Vec<&'static str>>,
    /// Movie recommendation requests for these ids wait on the gate
    pub gated_movies: Mutex<HashMap<String, Arc<Notify>>>,
    /// Browse searches wait on this gate when set
    pub search_gate: Mutex<Option<Arc<Notify>>>,
    pub ranked_count: usize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            initialized: true,
            ranked_count: 17,
            ..Default::default()
        }
    }

    pub fn uninitialized() -> Self {
        Self {
            initialized: false,
            ..Self::new()
        }
    }

    pub fn failing(self, endpoint: &'static str) -> Self {
        self.fail_endpoints.lock().unwrap().push(endpoint);
        self
    }

    pub fn gate_movie(&self, movie_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gated_movies
            .lock()
            .unwrap()
            .insert(movie_id.to_string(), gate.clone());
        gate
    }

    pub fn gate_search(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.search_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, endpoint: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(endpoint))
            .count()
    }

    fn record(&self, endpoint: &'static str, args: String) -> Result<(), ApiClientError> {
        self.calls.lock().unwrap().push(format!("{endpoint} {args}").trim_end().to_string());
        if self.fail_endpoints.lock().unwrap().contains(&endpoint) {
            return Err(ApiClientError::Transport {
                endpoint: endpoint.to_string(),
                reason: "connection refused".to_string(),
                timed_out: false,
            });
        }
        Ok(())
    }

    fn ranked(&self, prefix: &str) -> Vec<Movie> {
        (1..=self.ranked_count)
            .map(|i| Movie::new(format!("{prefix}{i}"), format!("Ranked {i}"), vec!["Drama".into()]))
            .collect()
    }
}

pub fn listing(genre: &str, limit: usize) -> Vec<Movie> {
    (1..=limit)
        .map(|i| Movie::new(format!("{genre}-{i}"), format!("{genre} movie {i}"), vec![genre.to_string()]))
        .collect()
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn health(&self) -> api_client::Result<HealthStatus> {
        self.record("health", String::new())?;
        Ok(HealthStatus {
            initialized: self.initialized,
            status: Some("healthy".into()),
            uptime: None,
        })
    }

    async fn init(&self) -> api_client::Result<InitConfirmation> {
        self.record("init", String::new())?;
        Ok(InitConfirmation {
            status: Some("success".into()),
            message: None,
        })
    }

    async fn stats(&self) -> api_client::Result<StatsResponse> {
        self.record("stats", String::new())?;
        Ok(StatsResponse {
            database: DatabaseCounts {
                movies: 3883,
                ratings: 1_000_209,
                users: 6040,
            },
        })
    }

    async fn genres(&self) -> api_client::Result<Vec<GenreEntry>> {
        self.record("genres", String::new())?;
        Ok(GENRES
            .iter()
            .map(|g| GenreEntry {
                genre: g.to_string(),
                count: Some(100),
            })
            .collect())
    }

    async fn search(&self, query: &SearchQuery) -> api_client::Result<Vec<Movie>> {
        self.record("search", format!("limit={}", query.limit))?;
        let gate = self.search_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(listing("Browse", query.limit))
    }

    async fn movies_by_genre(&self, genre: &str, limit: usize) -> api_client::Result<Vec<Movie>> {
        self.record("genre-listing", format!("{genre} limit={limit}"))?;
        Ok(listing(genre, limit))
    }

    async fn movie_recommendations(
        &self,
        movie_id: &str,
        method: Algorithm,
        limit: usize,
    ) -> api_client::Result<RecommendationEnvelope> {
        self.record(
            "recommendations",
            format!("{movie_id} method={method} limit={limit}"),
        )?;
        let gate = self.gated_movies.lock().unwrap().get(movie_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(RecommendationEnvelope {
            movie_id: Some(movie_id.to_string()),
            method: Some(method.as_str().to_string()),
            recommendations: self.ranked(&format!("m{movie_id}-")),
            ..Default::default()
        })
    }

    async fn genre_recommendations(
        &self,
        genres: &[GenreId],
        method: Algorithm,
        limit: usize,
    ) -> api_client::Result<RecommendationEnvelope> {
        self.record(
            "genre-recommendations",
            format!("genres={} method={method} limit={limit}", genres.join(",")),
        )?;
        Ok(RecommendationEnvelope {
            genres: genres.to_vec(),
            method: Some(method.as_str().to_string()),
            recommendations: self.ranked("g"),
            ..Default::default()
        })
    }

    async fn user_recommendations(
        &self,
        user_id: UserId,
        method: Algorithm,
        limit: usize,
    ) -> api_client::Result<RecommendationEnvelope> {
        self.record(
            "user-recommendations",
            format!("{user_id} method={method} limit={limit}"),
        )?;
        Ok(RecommendationEnvelope {
            user_id: Some(user_id.to_string()),
            recommendations: self.ranked("u").into_iter().take(limit).collect(),
            ..Default::default()
        })
    }

    async fn movie_detail(&self, movie_id: &str) -> api_client::Result<MovieDetail> {
        self.record("movie", movie_id.to_string())?;
        Ok(MovieDetail {
            movie: Movie::new(movie_id, format!("Movie {movie_id} (1995)"), vec!["Crime".into()]),
            stats: None,
            similar_movies: listing("Crime", 6),
            users_who_rated: Some(42),
        })
    }

    async fn methods(&self) -> api_client::Result<MethodCatalog> {
        self.record("methods", String::new())?;
        Ok(MethodCatalog::default())
    }

    async fn similarity(
        &self,
        movie_a: &str,
        movie_b: &str,
        _method: Algorithm,
    ) -> api_client::Result<SimilarityReport> {
        self.record("similarity", format!("{movie_a} {movie_b}"))?;
        Err(ApiClientError::Status {
            endpoint: "/similarity/{a}/{b}".to_string(),
            status: 404,
            body: "not found".to_string(),
        })
    }
}
