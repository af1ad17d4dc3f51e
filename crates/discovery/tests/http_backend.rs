//! Discovery session driven through the real HTTP client against an axum
//! mock of the backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use api_client::{ApiConfig, CatalogApi, HttpCatalogClient};
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use catalog::{Algorithm, Mood};
use discovery::DiscoverySession;
use serde_json::json;
use session::Mode;

#[derive(Clone, Default)]
struct Backend {
    initialized: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<Uri>>>,
}

impl Backend {
    fn record(&self, uri: Uri) {
        self.requests.lock().unwrap().push(uri);
    }

    fn paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.path().trim_start_matches("/api").to_string())
            .collect()
    }

    fn request_to(&self, path: &str) -> Option<Uri> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.path() == path)
            .cloned()
    }
}

type Params = Query<HashMap<String, String>>;

async fn health(State(backend): State<Backend>, uri: Uri) -> impl IntoResponse {
    backend.record(uri);
    Json(json!({
        "status": "healthy",
        "initialized": backend.initialized.load(Ordering::SeqCst)
    }))
}

async fn init(State(backend): State<Backend>, uri: Uri) -> impl IntoResponse {
    backend.record(uri);
    backend.initialized.store(true, Ordering::SeqCst);
    Json(json!({ "status": "success", "message": "Sistema inicializado" }))
}

async fn stats(State(backend): State<Backend>, uri: Uri) -> impl IntoResponse {
    backend.record(uri);
    Json(json!({ "database": { "movies": 3883, "ratings": 1000209, "users": 6040 } }))
}

async fn genres(State(backend): State<Backend>, uri: Uri) -> impl IntoResponse {
    backend.record(uri);
    Json(json!([
        { "genre": "Action", "count": 503 },
        { "genre": "Comedy", "count": 1200 },
        { "genre": "Thriller", "count": 492 }
    ]))
}

async fn genre_listing(
    State(backend): State<Backend>,
    Path(genre): Path<String>,
    Query(params): Params,
    uri: Uri,
) -> impl IntoResponse {
    backend.record(uri);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(20);
    let movies: Vec<_> = (1..=limit)
        .map(|i| json!({ "movieId": 1000 + i, "title": format!("{genre} {i} (1990)"), "genres": genre.clone() }))
        .collect();
    Json(json!(movies))
}

async fn recommendations(
    State(backend): State<Backend>,
    Path(movie_id): Path<String>,
    Query(params): Params,
    uri: Uri,
) -> impl IntoResponse {
    backend.record(uri);
    let movies: Vec<_> = (1..=17)
        .map(|i| json!({ "movieId": i * 10, "title": format!("Similar {i} (1995)"), "genres": "Drama", "similarity": 1.0 - i as f64 / 100.0 }))
        .collect();
    Json(json!({
        "movie_id": movie_id,
        "method": params.get("method"),
        "explanation": "Similitud coseno",
        "recommendations": movies,
        "count": 17
    }))
}

async fn start_backend() -> (String, Backend, tokio::task::JoinHandle<()>) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/init", get(init))
        .route("/api/stats", get(stats))
        .route("/api/genres", get(genres))
        .route("/api/genres/:genre", get(genre_listing))
        .route("/api/recommendations/:movie_id", get(recommendations))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api"), backend, handle)
}

fn session_for(base: &str) -> DiscoverySession {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let client = HttpCatalogClient::new(&ApiConfig::default().with_base_url(base)).unwrap();
    let api: Arc<dyn CatalogApi> = Arc::new(client);
    DiscoverySession::new(api)
}

#[tokio::test]
async fn test_cold_backend_bootstrap_and_movie_recommendations() {
    let (base, backend, handle) = start_backend().await;
    let session = session_for(&base);

    let snapshot = session.initialize().await.unwrap();
    assert!(snapshot.loaded);
    assert_eq!(snapshot.genres, vec!["Action", "Comedy", "Thriller"]);
    assert_eq!(backend.paths(), vec!["/health", "/init", "/stats", "/genres"]);

    session.enter_mode(Mode::ByMovies).await;
    for id in ["1", "7", "42"] {
        session.toggle_movie(id).await.unwrap();
    }
    session.set_algorithm(Algorithm::Cosine).await.unwrap();
    let outcome = session.calculate().await.unwrap();

    let result = outcome.result().unwrap();
    assert_eq!(result.ranked_movies.len(), 17);
    assert_eq!(result.ranked_movies[0].movie_id, "10");
    assert_eq!(session.visible().await.len(), 10);

    let uri = backend.request_to("/api/recommendations/1").unwrap();
    assert_eq!(uri.query(), Some("method=cosine&limit=20"));

    handle.abort();
}

#[tokio::test]
async fn test_mood_candidates_over_http() {
    let (base, backend, handle) = start_backend().await;
    let session = session_for(&base);
    session.initialize().await.unwrap();

    let candidates = session.enter_mood_mode(Mood::Suspenseful).await;
    assert_eq!(candidates.len(), 10);
    assert_eq!(candidates[0].genres, vec!["Thriller"]);

    let uri = backend.request_to("/api/genres/Thriller").unwrap();
    assert_eq!(uri.query(), Some("limit=10"));

    handle.abort();
}
