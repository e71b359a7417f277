#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use movieflix_api::config::ServerConfig;
use movieflix_api::router::build_app_router;
use movieflix_api::services::movie::MovieService;
use movieflix_api::state::AppState;
use movieflix_core::storage::{FileStorage, LocalFileStorage};
use movieflix_db::store::{MemoryMovieStore, MovieStore};

pub const BASE_URL: &str = "http://host";

const BOUNDARY: &str = "movieflix-test-boundary";

/// Build a test `ServerConfig` pointing posters at `poster_dir`.
pub fn test_config(poster_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        poster_dir: poster_dir.to_path_buf(),
        base_url: BASE_URL.to_string(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// A router over an in-memory store and a temporary poster directory.
///
/// Keep the struct alive for the duration of the test: dropping it removes
/// the poster directory.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryMovieStore>,
    pub poster_dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn poster_path(&self, name: &str) -> std::path::PathBuf {
        self.poster_dir.path().join(name)
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app() -> TestApp {
    let poster_dir = tempfile::tempdir().unwrap();
    let config = test_config(poster_dir.path());
    let store = Arc::new(MemoryMovieStore::new());

    let dyn_store: Arc<dyn MovieStore> = store.clone();
    let files: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new());
    let movies = MovieService::new(dyn_store, files, config.movie_service_config());

    let state = AppState {
        movies: Arc::new(movies),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        poster_dir,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Encode an optional `movieDto` JSON part and an optional `file` part as a
/// `multipart/form-data` body.
pub fn multipart_body(
    movie: Option<&serde_json::Value>,
    file: Option<(&str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(movie) = movie {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"movieDto\"\r\n\r\n");
        body.extend_from_slice(movie.to_string().as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((file_name, data)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    movie: Option<&serde_json::Value>,
    file: Option<(&str, &[u8])>,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(movie, file)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
