//! Poster file naming rules and URL construction.
//!
//! Posters are stored flat in a single directory, so every name that reaches
//! the filesystem must be a bare file name.

use crate::error::CoreError;

/// Path segment under the base URL where stored posters are served.
pub const FILE_ROUTE_SEGMENT: &str = "/file/";

/// Maximum length of a stored poster file name (bytes).
pub const MAX_FILE_NAME_LEN: usize = 255;

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Validate that `name` is a bare file name safe to join onto the storage
/// directory.
///
/// Rejects empty names, `.`/`..`, path separators and NUL bytes.
pub fn validate_file_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("File name must not be empty".into()));
    }
    if name.len() > MAX_FILE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "File name must be at most {MAX_FILE_NAME_LEN} bytes"
        )));
    }
    if name == "." || name == ".." {
        return Err(CoreError::Validation(format!("Invalid file name '{name}'")));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(CoreError::Validation(format!(
            "File name '{name}' must not contain path separators"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

/// Build the public URL of a stored poster: `{base_url}/file/{poster}`.
///
/// Plain concatenation. `base_url` is expected without a trailing slash;
/// the config loader trims it.
pub fn poster_url(base_url: &str, poster: &str) -> String {
    format!("{base_url}{FILE_ROUTE_SEGMENT}{poster}")
}

/// Guess a Content-Type from a file extension.
pub fn content_type_for_extension(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return "application/octet-stream",
    };
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
