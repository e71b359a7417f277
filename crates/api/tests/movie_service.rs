//! Tests for `MovieService` against the in-memory store and a temporary
//! poster directory.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use movieflix_api::error::AppError;
use movieflix_api::services::movie::{MovieService, MovieServiceConfig};
use movieflix_core::error::CoreError;
use movieflix_core::paging::{PageRequest, SortDirection, SortField};
use movieflix_core::storage::{FileStorage, LocalFileStorage, UploadedFile};
use movieflix_db::models::movie::MovieDto;
use movieflix_db::store::{MemoryMovieStore, MovieStore};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Local storage that counts deletions and can be told to fail them.
struct RecordingStorage {
    inner: LocalFileStorage,
    fail_deletes: bool,
    deletes: AtomicUsize,
}

impl RecordingStorage {
    fn new(fail_deletes: bool) -> Self {
        Self {
            inner: LocalFileStorage::new(),
            fail_deletes,
            deletes: AtomicUsize::new(0),
        }
    }

    fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileStorage for RecordingStorage {
    async fn upload_file(&self, dir: &Path, file: &UploadedFile) -> io::Result<String> {
        self.inner.upload_file(dir, file).await
    }

    async fn replace_file(&self, dir: &Path, file: &UploadedFile) -> io::Result<String> {
        self.inner.replace_file(dir, file).await
    }

    async fn exists(&self, dir: &Path, name: &str) -> io::Result<bool> {
        self.inner.exists(dir, name).await
    }

    async fn delete_if_exists(&self, dir: &Path, name: &str) -> io::Result<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.inner.delete_if_exists(dir, name).await
    }

    async fn read_file(&self, dir: &Path, name: &str) -> io::Result<Vec<u8>> {
        self.inner.read_file(dir, name).await
    }
}

struct Fixture {
    service: MovieService,
    store: Arc<MemoryMovieStore>,
    files: Arc<RecordingStorage>,
    dir: TempDir,
}

impl Fixture {
    fn new(fail_deletes: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryMovieStore::new());
        let files = Arc::new(RecordingStorage::new(fail_deletes));

        let dyn_store: Arc<dyn MovieStore> = store.clone();
        let dyn_files: Arc<dyn FileStorage> = files.clone();
        let service = MovieService::new(
            dyn_store,
            dyn_files,
            MovieServiceConfig {
                storage_dir: dir.path().to_path_buf(),
                base_url: "http://host".to_string(),
            },
        );

        Self {
            service,
            store,
            files,
            dir,
        }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}

fn inception() -> MovieDto {
    MovieDto {
        movie_id: None,
        title: "Inception".to_string(),
        director: "Nolan".to_string(),
        studio: None,
        cast: BTreeSet::new(),
        release_year: 2010,
        poster: String::new(),
        poster_url: String::new(),
    }
}

fn poster(name: &str) -> UploadedFile {
    UploadedFile::new(name, format!("bytes of {name}").into_bytes())
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_movie_assigns_id_and_builds_poster_url() {
    let fx = Fixture::new(false);

    let dto = fx
        .service
        .add_movie(inception(), poster("poster1.jpg"))
        .await
        .unwrap();

    assert!(dto.movie_id.is_some());
    assert_eq!(dto.poster, "poster1.jpg");
    assert_eq!(dto.poster_url, "http://host/file/poster1.jpg");
    assert_eq!(dto.title, "Inception");
    assert!(fx.path("poster1.jpg").exists());
}

#[tokio::test]
async fn add_movie_ignores_client_supplied_id_and_poster() {
    let fx = Fixture::new(false);
    let request = MovieDto {
        movie_id: Some(99),
        poster: "whatever.png".into(),
        poster_url: "http://elsewhere/x".into(),
        ..inception()
    };

    let dto = fx.service.add_movie(request, poster("real.jpg")).await.unwrap();

    assert_eq!(dto.movie_id, Some(1));
    assert_eq!(dto.poster, "real.jpg");
    assert_eq!(dto.poster_url, "http://host/file/real.jpg");
}

#[tokio::test]
async fn add_movie_with_existing_file_fails_without_insert() {
    let fx = Fixture::new(false);
    std::fs::write(fx.path("poster1.jpg"), b"unrelated").unwrap();

    let err = fx
        .service
        .add_movie(inception(), poster("poster1.jpg"))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::Core(CoreError::FileAlreadyExists(name)) if name == "poster1.jpg");
    assert!(fx.store.is_empty().await);
    assert_eq!(std::fs::read(fx.path("poster1.jpg")).unwrap(), b"unrelated");
}

#[tokio::test]
async fn add_movie_rejects_blank_title_before_upload() {
    let fx = Fixture::new(false);
    let request = MovieDto {
        title: "  ".into(),
        ..inception()
    };

    let err = fx
        .service
        .add_movie(request, poster("poster1.jpg"))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::Core(CoreError::Validation(_)));
    assert!(!fx.path("poster1.jpg").exists());
    assert!(fx.store.is_empty().await);
}

#[tokio::test]
async fn add_movie_rejects_empty_or_unsafe_files() {
    let fx = Fixture::new(false);

    let empty = fx
        .service
        .add_movie(inception(), UploadedFile::new("empty.jpg", Vec::new()))
        .await
        .unwrap_err();
    assert_matches!(empty, AppError::Core(CoreError::Validation(_)));

    let traversal = fx
        .service
        .add_movie(inception(), poster("../escape.jpg"))
        .await
        .unwrap_err();
    assert_matches!(traversal, AppError::Core(CoreError::Validation(_)));

    assert!(fx.store.is_empty().await);
}

// ---------------------------------------------------------------------------
// Get / list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_movie_returns_stored_movie() {
    let fx = Fixture::new(false);
    let added = fx
        .service
        .add_movie(inception(), poster("poster1.jpg"))
        .await
        .unwrap();

    let fetched = fx.service.get_movie(added.movie_id.unwrap()).await.unwrap();
    assert_eq!(fetched, added);
}

#[tokio::test]
async fn get_missing_movie_is_not_found() {
    let fx = Fixture::new(false);
    let err = fx.service.get_movie(42).await.unwrap_err();
    assert_matches!(
        err,
        AppError::Core(CoreError::NotFound { entity: "Movie", id: 42 })
    );
}

#[tokio::test]
async fn get_all_movies_computes_each_poster_url() {
    let fx = Fixture::new(false);
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        fx.service.add_movie(inception(), poster(name)).await.unwrap();
    }

    let all = fx.service.get_all_movies().await.unwrap();
    let urls: Vec<&str> = all.iter().map(|m| m.poster_url.as_str()).collect();
    assert_eq!(
        urls,
        [
            "http://host/file/a.jpg",
            "http://host/file/b.jpg",
            "http://host/file/c.jpg"
        ]
    );
}

#[tokio::test]
async fn get_movie_page_reports_totals() {
    let fx = Fixture::new(false);
    for (i, year) in [2001, 1999, 2005].into_iter().enumerate() {
        let dto = MovieDto {
            release_year: year,
            ..inception()
        };
        fx.service
            .add_movie(dto, poster(&format!("p{i}.jpg")))
            .await
            .unwrap();
    }

    let page = fx
        .service
        .get_movie_page(PageRequest {
            page_number: 0,
            page_size: 2,
            sort_by: SortField::ReleaseYear,
            direction: SortDirection::Asc,
        })
        .await
        .unwrap();

    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert!(!page.is_last);
    let years: Vec<i32> = page.movies.iter().map(|m| m.release_year).collect();
    assert_eq!(years, [1999, 2001]);

    let last = fx
        .service
        .get_movie_page(PageRequest {
            page_number: 1,
            page_size: 2,
            sort_by: SortField::ReleaseYear,
            direction: SortDirection::Asc,
        })
        .await
        .unwrap();
    assert!(last.is_last);
    assert_eq!(last.movies.len(), 1);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_without_file_keeps_poster_and_deletes_nothing() {
    let fx = Fixture::new(false);
    let added = fx
        .service
        .add_movie(inception(), poster("poster1.jpg"))
        .await
        .unwrap();
    let id = added.movie_id.unwrap();

    let request = MovieDto {
        title: "Inception (IMAX)".into(),
        ..inception()
    };
    let updated = fx.service.update_movie(id, request, None).await.unwrap();

    assert_eq!(updated.movie_id, Some(id));
    assert_eq!(updated.title, "Inception (IMAX)");
    assert_eq!(updated.poster, "poster1.jpg");
    assert_eq!(updated.poster_url, "http://host/file/poster1.jpg");
    assert_eq!(fx.files.delete_calls(), 0);
    assert!(fx.path("poster1.jpg").exists());
}

#[tokio::test]
async fn update_with_file_replaces_poster_and_keeps_id() {
    let fx = Fixture::new(false);
    let added = fx
        .service
        .add_movie(inception(), poster("old.jpg"))
        .await
        .unwrap();
    let id = added.movie_id.unwrap();

    let updated = fx
        .service
        .update_movie(id, inception(), Some(poster("new.jpg")))
        .await
        .unwrap();

    assert_eq!(updated.movie_id, Some(id));
    assert_eq!(updated.poster, "new.jpg");
    assert_eq!(updated.poster_url, "http://host/file/new.jpg");
    assert!(!fx.path("old.jpg").exists());
    assert!(fx.path("new.jpg").exists());

    let stored = fx.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.poster, "new.jpg");
    assert_eq!(fx.store.len().await, 1);
}

#[tokio::test]
async fn update_with_same_file_name_replaces_contents() {
    let fx = Fixture::new(false);
    let added = fx
        .service
        .add_movie(inception(), poster("poster.jpg"))
        .await
        .unwrap();
    let id = added.movie_id.unwrap();

    let replacement = UploadedFile::new("poster.jpg", b"new bytes".to_vec());
    let updated = fx
        .service
        .update_movie(id, inception(), Some(replacement))
        .await
        .unwrap();

    assert_eq!(updated.poster, "poster.jpg");
    assert_eq!(std::fs::read(fx.path("poster.jpg")).unwrap(), b"new bytes");
}

#[tokio::test]
async fn update_colliding_with_another_file_fails_before_mutation() {
    let fx = Fixture::new(false);
    let first = fx
        .service
        .add_movie(inception(), poster("first.jpg"))
        .await
        .unwrap();
    fx.service
        .add_movie(inception(), poster("second.jpg"))
        .await
        .unwrap();
    let id = first.movie_id.unwrap();

    let err = fx
        .service
        .update_movie(id, inception(), Some(poster("second.jpg")))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::Core(CoreError::FileAlreadyExists(_)));
    assert!(fx.path("first.jpg").exists());
    assert_eq!(fx.files.delete_calls(), 0);
    let stored = fx.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.poster, "first.jpg");
}

#[tokio::test]
async fn update_proceeds_when_old_poster_cannot_be_deleted() {
    let fx = Fixture::new(true);
    let added = fx
        .service
        .add_movie(inception(), poster("old.jpg"))
        .await
        .unwrap();
    let id = added.movie_id.unwrap();

    let updated = fx
        .service
        .update_movie(id, inception(), Some(poster("new.jpg")))
        .await
        .unwrap();

    assert_eq!(updated.poster, "new.jpg");
    assert_eq!(fx.files.delete_calls(), 1);
    assert!(fx.path("old.jpg").exists());
}

#[tokio::test]
async fn update_with_same_file_name_overwrites_when_deletes_fail() {
    let fx = Fixture::new(true);
    let added = fx
        .service
        .add_movie(inception(), poster("p.jpg"))
        .await
        .unwrap();
    let id = added.movie_id.unwrap();

    let updated = fx
        .service
        .update_movie(id, inception(), Some(UploadedFile::new("p.jpg", b"new".to_vec())))
        .await
        .unwrap();

    assert_eq!(updated.poster, "p.jpg");
    assert_eq!(fx.files.delete_calls(), 0);
    assert_eq!(std::fs::read(fx.path("p.jpg")).unwrap(), b"new");
}

#[tokio::test]
async fn update_missing_movie_is_not_found() {
    let fx = Fixture::new(false);
    let err = fx
        .service
        .update_movie(7, inception(), Some(poster("x.jpg")))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::Core(CoreError::NotFound { id: 7, .. }));
    assert!(!fx.path("x.jpg").exists());
    assert!(fx.store.is_empty().await);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_record_and_file() {
    let fx = Fixture::new(false);
    let added = fx
        .service
        .add_movie(inception(), poster("poster1.jpg"))
        .await
        .unwrap();
    let id = added.movie_id.unwrap();

    let message = fx.service.delete_movie(id).await.unwrap();

    assert_eq!(message, format!("Movie deleted with id: {id}"));
    assert!(fx.store.is_empty().await);
    assert!(!fx.path("poster1.jpg").exists());
}

#[tokio::test]
async fn delete_removes_record_even_when_file_delete_fails() {
    let fx = Fixture::new(true);
    let added = fx
        .service
        .add_movie(inception(), poster("poster1.jpg"))
        .await
        .unwrap();
    let id = added.movie_id.unwrap();

    fx.service.delete_movie(id).await.unwrap();

    assert!(fx.store.is_empty().await);
    assert_eq!(fx.files.delete_calls(), 1);
    assert!(fx.path("poster1.jpg").exists());
}

#[tokio::test]
async fn delete_tolerates_already_missing_file() {
    let fx = Fixture::new(false);
    let added = fx
        .service
        .add_movie(inception(), poster("poster1.jpg"))
        .await
        .unwrap();
    std::fs::remove_file(fx.path("poster1.jpg")).unwrap();

    fx.service
        .delete_movie(added.movie_id.unwrap())
        .await
        .unwrap();
    assert!(fx.store.is_empty().await);
}

#[tokio::test]
async fn delete_missing_movie_is_not_found_and_leaves_store_unchanged() {
    let fx = Fixture::new(false);
    fx.service
        .add_movie(inception(), poster("poster1.jpg"))
        .await
        .unwrap();

    let err = fx.service.delete_movie(999).await.unwrap_err();

    assert_matches!(err, AppError::Core(CoreError::NotFound { id: 999, .. }));
    assert_eq!(fx.store.len().await, 1);
    assert_eq!(fx.files.delete_calls(), 0);
}

// ---------------------------------------------------------------------------
// Standalone poster files
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_and_read_poster() {
    let fx = Fixture::new(false);

    let name = fx.service.upload_poster(poster("solo.png")).await.unwrap();
    assert_eq!(name, "solo.png");

    let bytes = fx.service.read_poster("solo.png").await.unwrap();
    assert_eq!(bytes, b"bytes of solo.png");

    let again = fx.service.upload_poster(poster("solo.png")).await.unwrap_err();
    assert_matches!(again, AppError::Core(CoreError::FileAlreadyExists(_)));
}

#[tokio::test]
async fn read_missing_poster_is_file_not_found() {
    let fx = Fixture::new(false);
    let err = fx.service.read_poster("nope.png").await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::FileNotFound(name)) if name == "nope.png");
}
