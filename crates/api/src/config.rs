use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::services::movie::MovieServiceConfig;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Front-end origins allowed by CORS.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Directory poster files are written to and served from.
    pub poster_dir: PathBuf,
    /// Public base URL used to build poster URLs, without a trailing slash.
    pub base_url: String,
    /// Largest multipart body accepted by the upload routes.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Read the environment, falling back to local-development defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `POSTER_DIR`           | `posters`                  |
    /// | `BASE_URL`             | `http://localhost:3000`    |
    /// | `MAX_UPLOAD_BYTES`     | `10485760` (10 MiB)        |
    ///
    /// Panics when a numeric variable does not parse.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: parse_origins(&env_or(
                "CORS_ORIGINS",
                "http://localhost:5173".to_string(),
            )),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            poster_dir: env_or("POSTER_DIR", PathBuf::from("posters")),
            base_url: normalize_base_url(&env_or(
                "BASE_URL",
                "http://localhost:3000".to_string(),
            )),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    pub fn movie_service_config(&self) -> MovieServiceConfig {
        MovieServiceConfig {
            storage_dir: self.poster_dir.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Parse `key` from the environment, or return `default` when it is unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

/// Trim whitespace and trailing slashes so `{base}/file/{name}` has no `//`.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
