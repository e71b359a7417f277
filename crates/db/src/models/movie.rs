//! Movie entity, its database row, and the client-facing transfer object.

use std::collections::BTreeSet;

use movieflix_core::poster::poster_url;
use movieflix_core::types::DbId;
use movieflix_core::validation::{cast_members_not_blank, not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A persisted movie.
///
/// `movie_id` is `None` until the record has been saved; the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub movie_id: Option<DbId>,
    pub title: String,
    pub director: String,
    pub studio: Option<String>,
    pub cast: BTreeSet<String>,
    pub release_year: i32,
    /// Stored file name of the poster, relative to the poster directory.
    pub poster: String,
}

impl Movie {
    /// Map a transfer object onto an entity.
    ///
    /// Names are trimmed and the cast de-duplicated after trimming;
    /// `poster_url` is dropped since it is never persisted.
    pub fn from_dto(dto: MovieDto) -> Self {
        Self {
            movie_id: dto.movie_id,
            title: dto.title.trim().to_string(),
            director: dto.director.trim().to_string(),
            studio: dto
                .studio
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            cast: dto
                .cast
                .into_iter()
                .map(|member| member.trim().to_string())
                .collect(),
            release_year: dto.release_year,
            poster: dto.poster,
        }
    }
}

/// A row from `movies` joined with its aggregated `movie_cast` members.
#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub movie_id: DbId,
    pub title: String,
    pub director: String,
    pub studio: Option<String>,
    pub release_year: i32,
    pub poster: String,
    pub movie_cast: Vec<String>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            movie_id: Some(row.movie_id),
            title: row.title,
            director: row.director,
            studio: row.studio,
            cast: row.movie_cast.into_iter().collect(),
            release_year: row.release_year,
            poster: row.poster,
        }
    }
}

/// Movie as exchanged with API clients.
///
/// On requests `movieId`, `poster` and `posterUrl` may be omitted: the
/// identifier comes from the path or the store, and the poster fields are
/// derived from the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    #[serde(default)]
    pub movie_id: Option<DbId>,

    #[validate(
        length(max = 200, message = "Title must be at most 200 characters"),
        custom(function = "not_blank", message = "Please provide movie's title!")
    )]
    pub title: String,

    #[validate(custom(function = "not_blank", message = "Please provide movie's director!"))]
    pub director: String,

    #[serde(default)]
    pub studio: Option<String>,

    #[serde(default, alias = "movieCast")]
    #[validate(custom(function = "cast_members_not_blank"))]
    pub cast: BTreeSet<String>,

    pub release_year: i32,

    #[serde(default)]
    pub poster: String,

    #[serde(default)]
    pub poster_url: String,
}

impl MovieDto {
    /// Map an entity onto a transfer object, computing `poster_url` from
    /// `base_url`.
    pub fn from_movie(movie: Movie, base_url: &str) -> Self {
        let poster_url = poster_url(base_url, &movie.poster);
        Self {
            movie_id: movie.movie_id,
            title: movie.title,
            director: movie.director,
            studio: movie.studio,
            cast: movie.cast,
            release_year: movie.release_year,
            poster: movie.poster,
            poster_url,
        }
    }
}

/// One page of movies plus the numbers a client needs to walk the rest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<MovieDto>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub is_last: bool,
}
