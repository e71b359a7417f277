//! Query parameter types for API handlers.

use serde::Deserialize;

/// Paging and sorting for `GET /movies/page`
/// (`?page_number=&page_size=&sort_by=&dir=`).
///
/// Values are clamped and validated by
/// [`movieflix_core::paging::PageRequest::from_params`].
#[derive(Debug, Default, Deserialize)]
pub struct MoviePageParams {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub dir: Option<String>,
}
