use std::sync::Arc;

use crate::services::movie::MovieService;

/// Handler state; clones share the same service.
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<MovieService>,
}
