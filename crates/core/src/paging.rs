//! Page and sort parameters for movie listings.

use crate::error::CoreError;

/// Default number of movies per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on movies per page.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Clamping
// ---------------------------------------------------------------------------

/// Clamp a user-provided page size to `[1, max]`.
pub fn clamp_page_size(size: Option<i64>, default: i64, max: i64) -> i64 {
    size.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided, zero-based page number to non-negative.
pub fn clamp_page_number(number: Option<i64>) -> i64 {
    number.unwrap_or(0).max(0)
}

/// Number of pages needed to hold `total` items, `page_size` per page.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Column a movie listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    MovieId,
    Title,
    Director,
    ReleaseYear,
}

impl SortField {
    /// Parse the API name (`movieId`, `title`, `director`, `releaseYear`).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "movieId" => Ok(Self::MovieId),
            "title" => Ok(Self::Title),
            "director" => Ok(Self::Director),
            "releaseYear" => Ok(Self::ReleaseYear),
            other => Err(CoreError::Validation(format!(
                "Unknown sort field '{other}'. Must be one of: movieId, title, director, releaseYear"
            ))),
        }
    }

    /// Database column name.
    pub fn column(self) -> &'static str {
        match self {
            Self::MovieId => "movie_id",
            Self::Title => "title",
            Self::Director => "director",
            Self::ReleaseYear => "release_year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc` / `desc`, case-insensitively.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(CoreError::Validation(format!(
                "Unknown sort direction '{other}'. Must be 'asc' or 'desc'"
            ))),
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Page request
// ---------------------------------------------------------------------------

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: i64,
    pub page_size: i64,
    pub sort_by: SortField,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Build a page request from raw query values, applying defaults and
    /// clamps. Unknown sort field or direction names are rejected.
    pub fn from_params(
        page_number: Option<i64>,
        page_size: Option<i64>,
        sort_by: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            page_number: clamp_page_number(page_number),
            page_size: clamp_page_size(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            sort_by: sort_by.map(SortField::parse).transpose()?.unwrap_or_default(),
            direction: direction
                .map(SortDirection::parse)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        self.page_number.saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
