//! `GET /health`, mounted at the root.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthReport {
    /// `ok` when every check passes, `degraded` otherwise.
    status: &'static str,
    version: &'static str,
    db_healthy: bool,
    poster_dir_ready: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let (db_healthy, poster_dir_ready) =
        tokio::join!(state.movies.store_healthy(), state.movies.poster_dir_ready());

    Json(HealthReport {
        status: if db_healthy && poster_dir_ready {
            "ok"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        poster_dir_ready,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
