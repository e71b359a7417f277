//! Multipart form parsing shared by the movie and file handlers.

use axum::extract::Multipart;
use movieflix_core::storage::UploadedFile;
use movieflix_db::models::movie::MovieDto;

use crate::error::{AppError, AppResult};

/// Name of the multipart field carrying the movie as JSON text.
pub const MOVIE_FIELD: &str = "movieDto";

/// Name of the multipart field carrying the poster bytes.
pub const FILE_FIELD: &str = "file";

/// The parts of a movie form that were present.
#[derive(Debug, Default)]
pub struct MovieForm {
    pub movie: Option<MovieDto>,
    pub file: Option<UploadedFile>,
}

impl MovieForm {
    /// The movie part, or a 400 if it was not sent.
    pub fn require_movie(&mut self) -> AppResult<MovieDto> {
        self.movie
            .take()
            .ok_or_else(|| AppError::BadRequest(format!("Missing required '{MOVIE_FIELD}' field")))
    }

    /// The file part, or a 400 if it was not sent.
    pub fn require_file(&mut self) -> AppResult<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| AppError::BadRequest(format!("Missing required '{FILE_FIELD}' field")))
    }
}

/// Read a multipart body into a [`MovieForm`].
///
/// A `file` part with neither a file name nor content (what browsers send
/// for an empty file input) counts as absent. Unknown fields are ignored.
pub async fn read_movie_form(mut multipart: Multipart) -> AppResult<MovieForm> {
    let mut form = MovieForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            MOVIE_FIELD => {
                let text = field.text().await?;
                let dto: MovieDto = serde_json::from_str(&text).map_err(|e| {
                    AppError::BadRequest(format!("Invalid '{MOVIE_FIELD}' JSON: {e}"))
                })?;
                form.movie = Some(dto);
            }
            FILE_FIELD => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                form.file = Some(UploadedFile::new(file_name, data.to_vec()));
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}
