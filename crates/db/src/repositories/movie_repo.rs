//! Repository for the `movies` and `movie_cast` tables.

use movieflix_core::paging::PageRequest;
use movieflix_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::movie::{Movie, MovieRow};

/// Select list shared across queries: movie columns plus the cast aggregated
/// into a sorted array. Must be followed by a `WHERE` (optional) and
/// [`GROUP_BY`].
const SELECT_WITH_CAST: &str = "SELECT m.movie_id, m.title, m.director, m.studio, \
     m.release_year, m.poster, \
     COALESCE(array_agg(c.cast_member ORDER BY c.cast_member) \
         FILTER (WHERE c.cast_member IS NOT NULL), '{}') AS movie_cast \
     FROM movies m \
     LEFT JOIN movie_cast c ON c.movie_id = m.movie_id";

const GROUP_BY: &str = "GROUP BY m.movie_id";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert or update depending on whether `movie.movie_id` is set,
    /// returning the stored movie with its identifier.
    pub async fn save(pool: &PgPool, movie: &Movie) -> Result<Movie, sqlx::Error> {
        match movie.movie_id {
            None => Self::create(pool, movie).await,
            Some(id) => Self::upsert(pool, id, movie).await,
        }
    }

    /// Insert a new movie and its cast in one transaction.
    pub async fn create(pool: &PgPool, movie: &Movie) -> Result<Movie, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO movies (title, director, studio, release_year, poster)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING movie_id",
        )
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(&movie.studio)
        .bind(movie.release_year)
        .bind(&movie.poster)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_cast(&mut tx, id, movie).await?;
        tx.commit().await?;

        Ok(Movie {
            movie_id: Some(id),
            ..movie.clone()
        })
    }

    /// Write `movie` under `id`, inserting the row if it does not exist, and
    /// replace its cast.
    ///
    /// An insert through this path does not advance the `movie_id` sequence.
    pub async fn upsert(pool: &PgPool, id: DbId, movie: &Movie) -> Result<Movie, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO movies (movie_id, title, director, studio, release_year, poster)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (movie_id) DO UPDATE SET
                title = EXCLUDED.title,
                director = EXCLUDED.director,
                studio = EXCLUDED.studio,
                release_year = EXCLUDED.release_year,
                poster = EXCLUDED.poster",
        )
        .bind(id)
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(&movie.studio)
        .bind(movie.release_year)
        .bind(&movie.poster)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM movie_cast WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_cast(&mut tx, id, movie).await?;
        tx.commit().await?;

        Ok(Movie {
            movie_id: Some(id),
            ..movie.clone()
        })
    }

    async fn insert_cast(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        movie: &Movie,
    ) -> Result<(), sqlx::Error> {
        if movie.cast.is_empty() {
            return Ok(());
        }
        let members: Vec<String> = movie.cast.iter().cloned().collect();
        sqlx::query(
            "INSERT INTO movie_cast (movie_id, cast_member)
             SELECT $1, UNNEST($2::text[])",
        )
        .bind(id)
        .bind(&members)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Find a movie by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("{SELECT_WITH_CAST} WHERE m.movie_id = $1 {GROUP_BY}");
        let row = sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Movie::from))
    }

    /// List all movies in insertion (ID) order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!("{SELECT_WITH_CAST} {GROUP_BY} ORDER BY m.movie_id");
        let rows = sqlx::query_as::<_, MovieRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    /// List one page of movies ordered by the requested column, with ID as
    /// the tie-breaker so pages are stable.
    pub async fn list_page(pool: &PgPool, page: &PageRequest) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "{SELECT_WITH_CAST} {GROUP_BY}
             ORDER BY m.{column} {dir}, m.movie_id {dir}
             LIMIT $1 OFFSET $2",
            column = page.sort_by.column(),
            dir = page.direction.sql(),
        );
        let rows = sqlx::query_as::<_, MovieRow>(&query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    /// Total number of movies.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a movie (its cast rows cascade) inside a
    /// transaction. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM movies WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
