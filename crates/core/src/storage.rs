//! Poster file storage.
//!
//! [`FileStorage`] is the seam between the movie service and wherever poster
//! bytes actually live. [`LocalFileStorage`] writes them to a directory on the
//! local filesystem.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// A file payload received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as sent by the client.
    pub original_name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            data: data.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Storage operations the movie service needs against a poster directory.
///
/// All names are bare file names relative to `dir`; callers validate them
/// with [`crate::poster::validate_file_name`] first.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Write `file` into `dir` and return the name it was stored under.
    async fn upload_file(&self, dir: &Path, file: &UploadedFile) -> io::Result<String>;

    /// Write `file` into `dir`, truncating any file already stored under its
    /// name, and return the stored name.
    async fn replace_file(&self, dir: &Path, file: &UploadedFile) -> io::Result<String>;

    /// Whether a file called `name` exists in `dir`.
    async fn exists(&self, dir: &Path, name: &str) -> io::Result<bool>;

    /// Remove `name` from `dir`. Returns `false` if it was already absent.
    async fn delete_if_exists(&self, dir: &Path, name: &str) -> io::Result<bool>;

    /// Read the full contents of `name` in `dir`.
    async fn read_file(&self, dir: &Path, name: &str) -> io::Result<Vec<u8>>;
}

/// [`FileStorage`] backed by the local filesystem via `tokio::fs`.
///
/// Files keep their original name. `upload_file` never overwrites: the file
/// is opened with `create_new`, so a name that appeared after the caller's
/// existence check fails with [`io::ErrorKind::AlreadyExists`].
/// `replace_file` truncates in place.
#[derive(Debug, Clone, Default)]
pub struct LocalFileStorage;

impl LocalFileStorage {
    pub fn new() -> Self {
        Self
    }
}

impl LocalFileStorage {
    async fn write(&self, dir: &Path, file: &UploadedFile, overwrite: bool) -> io::Result<String> {
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(&file.original_name);
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let mut out = options.open(&path).await?;
        out.write_all(&file.data).await?;
        out.flush().await?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = file.data.len(),
            overwrite,
            "Poster file written"
        );
        Ok(file.original_name.clone())
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn upload_file(&self, dir: &Path, file: &UploadedFile) -> io::Result<String> {
        self.write(dir, file, false).await
    }

    async fn replace_file(&self, dir: &Path, file: &UploadedFile) -> io::Result<String> {
        self.write(dir, file, true).await
    }

    async fn exists(&self, dir: &Path, name: &str) -> io::Result<bool> {
        tokio::fs::try_exists(dir.join(name)).await
    }

    async fn delete_if_exists(&self, dir: &Path, name: &str) -> io::Result<bool> {
        match tokio::fs::remove_file(dir.join(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn read_file(&self, dir: &Path, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(dir.join(name)).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
