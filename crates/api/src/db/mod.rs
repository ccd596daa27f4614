//! Database layer for the storefront `PostgreSQL` instance.
//!
//! The database is used as a plain document-ish store:
//!
//! - `products` - the catalog (read-mostly; stock decremented at checkout)
//! - `users` - one row per user, with the embedded cart and order
//!   back-references as JSONB columns plus a `version` column for
//!   optimistic concurrency
//! - `orders` - immutable, append-only order records
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p lightning-stores-cli -- migrate
//! ```
//!
//! Every query is bounded by a per-call timeout (see [`with_timeout`]): a
//! hung store connection surfaces as [`RepositoryError::Timeout`], which the
//! HTTP layer maps to a retryable 503, instead of blocking the request
//! forever.

pub mod postgres;

pub use postgres::PgStore;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors from the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store did not answer within the configured deadline.
    #[error("store call timed out")]
    Timeout,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run a store future with a deadline.
///
/// # Errors
///
/// Returns [`RepositoryError::Timeout`] when the deadline elapses, otherwise
/// propagates the underlying sqlx error.
pub(crate) async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(RepositoryError::from),
        Err(_) => Err(RepositoryError::Timeout),
    }
}
