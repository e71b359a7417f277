//! Movie persistence gateway.
//!
//! [`MovieStore`] is what the service layer depends on. [`PgMovieStore`]
//! forwards to [`MovieRepo`]; [`MemoryMovieStore`] keeps everything in a
//! map and backs the service and HTTP tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use movieflix_core::paging::{PageRequest, SortDirection, SortField};
use movieflix_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::movie::Movie;
use crate::repositories::MovieRepo;
use crate::DbPool;

/// A slice of movies plus the total count across all pages.
#[derive(Debug, Clone)]
pub struct MovieSlice {
    pub movies: Vec<Movie>,
    pub total: i64,
}

/// Save/find/delete access to movie records.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Insert when `movie.movie_id` is `None` (assigning an identifier),
    /// otherwise upsert by identifier. Returns the stored movie.
    async fn save(&self, movie: Movie) -> Result<Movie, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, sqlx::Error>;

    /// Every movie, in the store's native order.
    async fn find_all(&self) -> Result<Vec<Movie>, sqlx::Error>;

    async fn find_page(&self, page: &PageRequest) -> Result<MovieSlice, sqlx::Error>;

    /// Remove a movie. Returns `true` if it existed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`MovieStore`] over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgMovieStore {
    pool: DbPool,
}

impl PgMovieStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn save(&self, movie: Movie) -> Result<Movie, sqlx::Error> {
        MovieRepo::save(&self.pool, &movie).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        MovieRepo::find_by_id(&self.pool, id).await
    }

    async fn find_all(&self) -> Result<Vec<Movie>, sqlx::Error> {
        MovieRepo::list(&self.pool).await
    }

    async fn find_page(&self, page: &PageRequest) -> Result<MovieSlice, sqlx::Error> {
        let movies = MovieRepo::list_page(&self.pool, page).await?;
        let total = MovieRepo::count(&self.pool).await?;
        Ok(MovieSlice { movies, total })
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        MovieRepo::delete(&self.pool, id).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct MemoryState {
    next_id: DbId,
    movies: BTreeMap<DbId, Movie>,
}

/// [`MovieStore`] kept in process memory. Identifiers start at 1 and are
/// never reused; native order is by identifier.
#[derive(Debug)]
pub struct MemoryMovieStore {
    state: RwLock<MemoryState>,
}

impl MemoryMovieStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                movies: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored movies.
    pub async fn len(&self) -> usize {
        self.state.read().await.movies.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryMovieStore {
    fn default() -> Self {
        Self::new()
    }
}

fn compare(a: &Movie, b: &Movie, field: SortField) -> std::cmp::Ordering {
    let by_field = match field {
        SortField::MovieId => a.movie_id.cmp(&b.movie_id),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Director => a.director.cmp(&b.director),
        SortField::ReleaseYear => a.release_year.cmp(&b.release_year),
    };
    by_field.then_with(|| a.movie_id.cmp(&b.movie_id))
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn save(&self, mut movie: Movie) -> Result<Movie, sqlx::Error> {
        let mut state = self.state.write().await;
        let id = match movie.movie_id {
            Some(id) => {
                state.next_id = state.next_id.max(id.saturating_add(1));
                id
            }
            None => {
                let id = state.next_id;
                state.next_id += 1;
                id
            }
        };
        movie.movie_id = Some(id);
        state.movies.insert(id, movie.clone());
        Ok(movie)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        Ok(self.state.read().await.movies.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Movie>, sqlx::Error> {
        Ok(self.state.read().await.movies.values().cloned().collect())
    }

    async fn find_page(&self, page: &PageRequest) -> Result<MovieSlice, sqlx::Error> {
        let state = self.state.read().await;
        let mut movies: Vec<Movie> = state.movies.values().cloned().collect();
        movies.sort_by(|a, b| match page.direction {
            SortDirection::Asc => compare(a, b, page.sort_by),
            SortDirection::Desc => compare(b, a, page.sort_by),
        });

        let total = movies.len() as i64;
        let movies = movies
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(0))
            .collect();
        Ok(MovieSlice { movies, total })
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.state.write().await.movies.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
