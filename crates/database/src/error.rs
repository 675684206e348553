//! Database error types.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Postgres error detail or code, when the driver surfaced one.
    ///
    /// Storage failures are reported to API clients with whatever extra
    /// context the server gave us (constraint violations carry a detail
    /// line, most other errors at least a SQLSTATE code).
    pub fn detail(&self) -> Option<String> {
        let DatabaseError::Sqlx(sqlx::Error::Database(db_err)) = self else {
            return None;
        };

        db_err
            .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
            .and_then(|pg_err| pg_err.detail().map(str::to_string))
            .or_else(|| db_err.code().map(|code| code.to_string()))
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
