//! Movie use cases: add, get, list, update, delete.
//!
//! The service ties a [`MovieStore`] to a [`FileStorage`] poster directory.
//! File and record writes are not atomic with respect to each other: a
//! failure between the upload and the save leaves an orphaned poster file,
//! and two concurrent adds of the same file name race between the existence
//! check and the upload (the loser gets an I/O error from the storage).

use std::path::PathBuf;
use std::sync::Arc;

use movieflix_core::error::CoreError;
use movieflix_core::paging::{total_pages, PageRequest};
use movieflix_core::poster::validate_file_name;
use movieflix_core::storage::{FileStorage, UploadedFile};
use movieflix_core::types::DbId;
use movieflix_core::validation::into_core_error;
use movieflix_db::models::movie::{Movie, MovieDto, MoviePage};
use movieflix_db::store::MovieStore;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Where posters live and how their public URLs are built.
#[derive(Debug, Clone)]
pub struct MovieServiceConfig {
    /// Directory poster files are stored in.
    pub storage_dir: PathBuf,
    /// Prefix for poster URLs (`{base_url}/file/{poster}`), no trailing slash.
    pub base_url: String,
}

/// Orchestrates the movie store and poster storage.
pub struct MovieService {
    store: Arc<dyn MovieStore>,
    files: Arc<dyn FileStorage>,
    config: MovieServiceConfig,
}

fn movie_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Movie", id })
}

impl MovieService {
    pub fn new(
        store: Arc<dyn MovieStore>,
        files: Arc<dyn FileStorage>,
        config: MovieServiceConfig,
    ) -> Self {
        Self {
            store,
            files,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Movies
    // -----------------------------------------------------------------------

    /// Store `file` as the poster of a new movie and persist the movie.
    ///
    /// Fails with [`CoreError::FileAlreadyExists`] before touching anything
    /// if a file with the upload's name is already in the poster directory.
    pub async fn add_movie(&self, dto: MovieDto, file: UploadedFile) -> AppResult<MovieDto> {
        dto.validate().map_err(into_core_error)?;
        let stored_name = self.store_new_poster(&file).await?;

        let mut movie = Movie::from_dto(dto);
        movie.movie_id = None;
        movie.poster = stored_name;

        let saved = self.store.save(movie).await?;
        tracing::info!(
            movie_id = ?saved.movie_id,
            poster = %saved.poster,
            "Movie added"
        );
        Ok(self.to_dto(saved))
    }

    pub async fn get_movie(&self, id: DbId) -> AppResult<MovieDto> {
        let movie = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| movie_not_found(id))?;
        Ok(self.to_dto(movie))
    }

    /// Every movie, in the store's native order.
    pub async fn get_all_movies(&self) -> AppResult<Vec<MovieDto>> {
        let movies = self.store.find_all().await?;
        Ok(movies.into_iter().map(|m| self.to_dto(m)).collect())
    }

    pub async fn get_movie_page(&self, page: PageRequest) -> AppResult<MoviePage> {
        let slice = self.store.find_page(&page).await?;
        let pages = total_pages(slice.total, page.page_size);
        Ok(MoviePage {
            movies: slice.movies.into_iter().map(|m| self.to_dto(m)).collect(),
            page_number: page.page_number,
            page_size: page.page_size,
            total_elements: slice.total,
            total_pages: pages,
            is_last: page.page_number.saturating_add(1) >= pages,
        })
    }

    /// Replace the fields of movie `id` with `dto`, keeping its identifier.
    ///
    /// With no `file`, the current poster is kept. A `file` named like the
    /// current poster overwrites it in place. Any other `file` goes through
    /// the collision check of [`Self::add_movie`], then the old poster is
    /// removed (best effort) and the new one uploaded.
    pub async fn update_movie(
        &self,
        id: DbId,
        dto: MovieDto,
        file: Option<UploadedFile>,
    ) -> AppResult<MovieDto> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| movie_not_found(id))?;
        dto.validate().map_err(into_core_error)?;

        let poster = match file {
            None => existing.poster,
            Some(file) => {
                check_upload(&file)?;
                if file.original_name == existing.poster {
                    self.files
                        .replace_file(&self.config.storage_dir, &file)
                        .await?
                } else {
                    self.ensure_poster_absent(&file.original_name).await?;
                    self.remove_poster(id, &existing.poster).await;
                    self.files
                        .upload_file(&self.config.storage_dir, &file)
                        .await?
                }
            }
        };

        let mut movie = Movie::from_dto(dto);
        movie.movie_id = Some(id);
        movie.poster = poster;

        let saved = self.store.save(movie).await?;
        tracing::info!(movie_id = id, poster = %saved.poster, "Movie updated");
        Ok(self.to_dto(saved))
    }

    /// Delete movie `id` and, best effort, its poster file.
    ///
    /// A poster that cannot be removed is logged and left behind; the record
    /// is deleted regardless.
    pub async fn delete_movie(&self, id: DbId) -> AppResult<String> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| movie_not_found(id))?;

        self.remove_poster(id, &existing.poster).await;

        if !self.store.delete(id).await? {
            return Err(movie_not_found(id));
        }
        tracing::info!(movie_id = id, "Movie deleted");
        Ok(format!("Movie deleted with id: {id}"))
    }

    // -----------------------------------------------------------------------
    // Poster files
    // -----------------------------------------------------------------------

    /// Store a standalone poster file, refusing to overwrite.
    pub async fn upload_poster(&self, file: UploadedFile) -> AppResult<String> {
        let stored_name = self.store_new_poster(&file).await?;
        tracing::info!(file_name = %stored_name, "Poster uploaded");
        Ok(stored_name)
    }

    /// Read a stored poster by file name.
    pub async fn read_poster(&self, name: &str) -> AppResult<Vec<u8>> {
        validate_file_name(name)?;
        match self.files.read_file(&self.config.storage_dir, name).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CoreError::FileNotFound(name.to_string()).into())
            }
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    /// Whether the backing store answers.
    pub async fn store_healthy(&self) -> bool {
        match self.store.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Movie store health check failed");
                false
            }
        }
    }

    /// Whether the poster directory exists and is a directory.
    pub async fn poster_dir_ready(&self) -> bool {
        tokio::fs::metadata(&self.config.storage_dir)
            .await
            .is_ok_and(|meta| meta.is_dir())
    }

    async fn store_new_poster(&self, file: &UploadedFile) -> AppResult<String> {
        check_upload(file)?;
        self.ensure_poster_absent(&file.original_name).await?;
        Ok(self
            .files
            .upload_file(&self.config.storage_dir, file)
            .await?)
    }

    async fn ensure_poster_absent(&self, name: &str) -> AppResult<()> {
        let exists = self
            .files
            .exists(&self.config.storage_dir, name)
            .await?;
        if exists {
            return Err(CoreError::FileAlreadyExists(name.to_string()).into());
        }
        Ok(())
    }

    /// Best-effort removal of a movie's poster. Never fails.
    async fn remove_poster(&self, movie_id: DbId, poster: &str) {
        if let Err(e) = validate_file_name(poster) {
            tracing::warn!(movie_id, poster, error = %e, "Skipping removal of invalid poster name");
            return;
        }
        match self
            .files
            .delete_if_exists(&self.config.storage_dir, poster)
            .await
        {
            Ok(true) => tracing::info!(movie_id, poster, "Deleted poster file"),
            Ok(false) => tracing::debug!(movie_id, poster, "Poster file already absent"),
            Err(e) => tracing::warn!(
                movie_id,
                poster,
                error = %e,
                "Failed to delete poster file, leaving it behind"
            ),
        }
    }

    fn to_dto(&self, movie: Movie) -> MovieDto {
        MovieDto::from_movie(movie, &self.config.base_url)
    }
}

/// Reject uploads with unusable names or no content.
fn check_upload(file: &UploadedFile) -> Result<(), CoreError> {
    validate_file_name(&file.original_name)?;
    if file.is_empty() {
        return Err(CoreError::Validation(format!(
            "File '{}' is empty",
            file.original_name
        )));
    }
    Ok(())
}
