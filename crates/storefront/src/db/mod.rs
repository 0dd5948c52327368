//! Database access layer.
//!
//! Repositories are thin structs over a borrowed [`PgPool`]; all queries
//! are runtime-checked so the crate builds without a live database.

pub mod cart;
pub mod products;
pub mod users;

pub use cart::CartRepository;
pub use products::{ProductRepository, SearchParams, SortOrder};
pub use users::{UserRecord, UserRepository};

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row exists but its contents could not be interpreted.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Entity not found.
    #[error("not found")]
    NotFound,

    /// Uniqueness conflict (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Whether the underlying database error was a unique-constraint
    /// violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("23505")
            }
            _ => false,
        }
    }
}

/// Create a connection pool for the given database URL.
///
/// # Errors
///
/// Returns `sqlx::Error` if the pool cannot be created or the initial
/// connection fails.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
