//! Store error types.

/// Errors from record store operations.
///
/// The memory backend is infallible; every variant here originates from the
/// Postgres backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query or connection failure from the database.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
