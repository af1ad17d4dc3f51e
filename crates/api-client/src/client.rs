//! The `CatalogApi` seam and its reqwest implementation.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use catalog::{Algorithm, GenreId, Movie, MovieDetail, UserId};

use crate::config::ApiConfig;
use crate::error::{ApiClientError, Result};
use crate::responses::{
    GenreEntry, HealthStatus, InitConfirmation, MethodCatalog, RecommendationEnvelope,
    SimilarityReport, StatsResponse,
};
use crate::search::SearchQuery;

/// Read-only operations of the recommendation backend.
///
/// Every method maps to exactly one idempotent `GET`. Implementations must
/// not retry; callers decide what a failure means.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus>;

    /// `GET /init`
    async fn init(&self) -> Result<InitConfirmation>;

    /// `GET /stats`
    async fn stats(&self) -> Result<StatsResponse>;

    /// `GET /genres`
    async fn genres(&self) -> Result<Vec<GenreEntry>>;

    /// `GET /search`
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Movie>>;

    /// `GET /genres/{genre}?limit=N`
    async fn movies_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<Movie>>;

    /// `GET /recommendations/{movieId}?method=..&limit=N`
    async fn movie_recommendations(
        &self,
        movie_id: &str,
        method: Algorithm,
        limit: usize,
    ) -> Result<RecommendationEnvelope>;

    /// `GET /genre-recommendations?genres={csv}&method=..&limit=N`
    async fn genre_recommendations(
        &self,
        genres: &[GenreId],
        method: Algorithm,
        limit: usize,
    ) -> Result<RecommendationEnvelope>;

    /// `GET /user-recommendations/{userId}?method=..&limit=N`
    async fn user_recommendations(
        &self,
        user_id: UserId,
        method: Algorithm,
        limit: usize,
    ) -> Result<RecommendationEnvelope>;

    /// `GET /movies/{movieId}`
    async fn movie_detail(&self, movie_id: &str) -> Result<MovieDetail>;

    /// `GET /methods`
    async fn methods(&self) -> Result<MethodCatalog>;

    /// `GET /similarity/{a}/{b}?method=..`
    async fn similarity(&self, movie_a: &str, movie_b: &str, method: Algorithm) -> Result<SimilarityReport>;
}

/// HTTP client for the recommendation backend.
///
/// Cheap to clone: the underlying reqwest connection pool is shared.
#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: Url,
}

impl HttpCatalogClient {
    /// Build a client from configuration.
    ///
    /// Fails if the base URL does not parse or cannot carry path segments.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiClientError::ClientBuild(e.to_string()))?;

        debug!("Recommendation backend client targeting {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments and query pairs to the base URL
    pub(crate) fn endpoint_url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| ApiClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?;
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: Url) -> Result<T> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Request to {} failed: {}", endpoint, e);
            ApiClientError::Transport {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
                timed_out: e.is_timeout(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            error!("{} returned HTTP {}", endpoint, status.as_u16());
            return Err(ApiClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| ApiClientError::Transport {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
            timed_out: e.is_timeout(),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Could not decode {} response: {}", endpoint, e);
            ApiClientError::InvalidResponse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

fn ranked_query(method: Algorithm, limit: usize) -> Vec<(&'static str, String)> {
    vec![("method", method.as_str().to_string()), ("limit", limit.to_string())]
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint_url(&["health"], &[])?;
        self.get_json("/health", url).await
    }

    async fn init(&self) -> Result<InitConfirmation> {
        let url = self.endpoint_url(&["init"], &[])?;
        self.get_json("/init", url).await
    }

    async fn stats(&self) -> Result<StatsResponse> {
        let url = self.endpoint_url(&["stats"], &[])?;
        self.get_json("/stats", url).await
    }

    async fn genres(&self) -> Result<Vec<GenreEntry>> {
        let url = self.endpoint_url(&["genres"], &[])?;
        self.get_json("/genres", url).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Movie>> {
        let url = self.endpoint_url(&["search"], &query.query_pairs())?;
        self.get_json("/search", url).await
    }

    async fn movies_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<Movie>> {
        let url = self.endpoint_url(&["genres", genre], &[("limit", limit.to_string())])?;
        self.get_json("/genres/{genre}", url).await
    }

    async fn movie_recommendations(
        &self,
        movie_id: &str,
        method: Algorithm,
        limit: usize,
    ) -> Result<RecommendationEnvelope> {
        let url = self.endpoint_url(&["recommendations", movie_id], &ranked_query(method, limit))?;
        self.get_json("/recommendations/{movieId}", url).await
    }

    async fn genre_recommendations(
        &self,
        genres: &[GenreId],
        method: Algorithm,
        limit: usize,
    ) -> Result<RecommendationEnvelope> {
        let mut query = vec![("genres", genres.join(","))];
        query.extend(ranked_query(method, limit));
        let url = self.endpoint_url(&["genre-recommendations"], &query)?;
        self.get_json("/genre-recommendations", url).await
    }

    async fn user_recommendations(
        &self,
        user_id: UserId,
        method: Algorithm,
        limit: usize,
    ) -> Result<RecommendationEnvelope> {
        let user = user_id.to_string();
        let url = self.endpoint_url(&["user-recommendations", &user], &ranked_query(method, limit))?;
        self.get_json("/user-recommendations/{userId}", url).await
    }

    async fn movie_detail(&self, movie_id: &str) -> Result<MovieDetail> {
        let url = self.endpoint_url(&["movies", movie_id], &[])?;
        self.get_json("/movies/{movieId}", url).await
    }

    async fn methods(&self) -> Result<MethodCatalog> {
        let url = self.endpoint_url(&["methods"], &[])?;
        self.get_json("/methods", url).await
    }

    async fn similarity(&self, movie_a: &str, movie_b: &str, method: Algorithm) -> Result<SimilarityReport> {
        let url = self.endpoint_url(
            &["similarity", movie_a, movie_b],
            &[("method", method.as_str().to_string())],
        )?;
        self.get_json("/similarity/{a}/{b}", url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpCatalogClient {
        HttpCatalogClient::new(&ApiConfig::default().with_base_url(base)).unwrap()
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let result = HttpCatalogClient::new(&ApiConfig::default().with_base_url("not a url"));
        assert!(matches!(result, Err(ApiClientError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_rejects_non_hierarchical_base_url() {
        let result = HttpCatalogClient::new(&ApiConfig::default().with_base_url("mailto:ops@example.com"));
        assert!(matches!(result, Err(ApiClientError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_segments_are_appended_to_base_path() {
        let client = client("http://localhost:5000/api");
        let url = client.endpoint_url(&["health"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/health");

        // Trailing slash on the base must not produce "//"
        let client = client_with_slash();
        let url = client.endpoint_url(&["stats"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/stats");
    }

    fn client_with_slash() -> HttpCatalogClient {
        client("http://localhost:5000/api/")
    }

    #[test]
    fn test_genre_segment_is_percent_encoded() {
        let client = client("http://localhost:5000/api");
        let url = client
            .endpoint_url(&["genres", "Children's Film/Noir"], &[("limit", "10".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/genres/Children's%20Film%2FNoir?limit=10"
        );
    }

    #[test]
    fn test_ranked_query_pairs() {
        let client = client("http://localhost:5000/api");
        let url = client
            .endpoint_url(&["recommendations", "1"], &ranked_query(Algorithm::Cosine, 20))
            .unwrap();
        assert_eq!(url.path(), "/api/recommendations/1");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("method".to_string(), "cosine".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }
}
