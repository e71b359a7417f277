//! Handlers for stored poster files under `/file`.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use movieflix_core::poster::content_type_for_extension;

use crate::error::AppResult;
use crate::handlers::form::read_movie_form;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /file/upload
///
/// Multipart form with a required `file` field. Refuses to overwrite an
/// existing file of the same name.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<String>>)> {
    let file = read_movie_form(multipart).await?.require_file()?;
    let stored_name = state.movies.upload_poster(file).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(format!("File uploaded : {stored_name}"))),
    ))
}

/// GET /file/{file_name}
///
/// Serves a stored poster with a Content-Type guessed from its extension.
pub async fn serve(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> AppResult<Response> {
    let bytes = state.movies.read_poster(&file_name).await?;
    let content_type = content_type_for_extension(&file_name);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
