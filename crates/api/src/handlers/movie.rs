//! Handlers for the `/movies` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use movieflix_core::paging::PageRequest;
use movieflix_core::types::DbId;
use movieflix_db::models::movie::{MovieDto, MoviePage};

use crate::error::AppResult;
use crate::handlers::form::read_movie_form;
use crate::query::MoviePageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/movies
///
/// Multipart form with a `movieDto` JSON field and a required `file` field
/// holding the poster.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<MovieDto>>)> {
    let mut form = read_movie_form(multipart).await?;
    let dto = form.require_movie()?;
    let file = form.require_file()?;

    let movie = state.movies.add_movie(dto, file).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(movie))))
}

/// GET /api/v1/movies
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<MovieDto>>>> {
    let movies = state.movies.get_all_movies().await?;
    Ok(Json(DataResponse::new(movies)))
}

/// GET /api/v1/movies/page
pub async fn list_page(
    State(state): State<AppState>,
    Query(params): Query<MoviePageParams>,
) -> AppResult<Json<DataResponse<MoviePage>>> {
    let page = PageRequest::from_params(
        params.page_number,
        params.page_size,
        params.sort_by.as_deref(),
        params.dir.as_deref(),
    )?;
    let movies = state.movies.get_movie_page(page).await?;
    Ok(Json(DataResponse::new(movies)))
}

/// GET /api/v1/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MovieDto>>> {
    let movie = state.movies.get_movie(id).await?;
    Ok(Json(DataResponse::new(movie)))
}

/// PUT /api/v1/movies/{id}
///
/// Multipart form with a `movieDto` JSON field and an optional `file` field.
/// Without a file the current poster is kept.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<MovieDto>>> {
    let mut form = read_movie_form(multipart).await?;
    let dto = form.require_movie()?;

    let movie = state.movies.update_movie(id, dto, form.file.take()).await?;
    Ok(Json(DataResponse::new(movie)))
}

/// DELETE /api/v1/movies/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<String>>> {
    let message = state.movies.delete_movie(id).await?;
    Ok(Json(DataResponse::new(message)))
}
