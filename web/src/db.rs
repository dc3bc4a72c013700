//! Connection pool and the bridge from diesel's blocking API to handlers.

use actix_web::web;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::QueryResult;
use sensorhub_core::{AppError, AppResult};

/// Shared PostgreSQL connection pool.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a pool that connects lazily, on first checkout.
pub fn build_pool(database_url: &str, max_size: u32) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .min_idle(Some(0))
        .build_unchecked(manager)
}

/// Runs `query` on a pooled connection on the blocking thread pool.
pub async fn run<T, F>(pool: &DbPool, query: F) -> AppResult<T>
where
    F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = pool
            .get()
            .map_err(|e| AppError::Database(format!("connection pool: {e}")))?;
        query(&mut conn).map_err(classify)
    })
    .await
    .map_err(|e| AppError::Database(e.to_string()))?
}

/// Maps a diesel error onto the workspace error kinds.
pub fn classify(error: DieselError) -> AppError {
    match error {
        DieselError::NotFound => AppError::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            AppError::Conflict(info.message().to_string())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            AppError::InvalidReference(info.message().to_string())
        }
        other => AppError::Database(other.to_string()),
    }
}
