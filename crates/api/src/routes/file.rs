//! Route definitions for stored poster files.
//!
//! Mounted at the root, outside `/api/v1`, because poster URLs are built as
//! `{BASE_URL}/file/{name}`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::file;
use crate::state::AppState;

/// ```text
/// POST   /file/upload        -> upload
/// GET    /file/{file_name}   -> serve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/file/upload", post(file::upload))
        .route("/file/{file_name}", get(file::serve))
}
