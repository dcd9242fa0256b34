//! Error types for the database layer.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Database error types.
#[derive(Debug, Error, Diagnostic)]
pub enum DbError {
    /// SQLite/sqlx error
    #[error("Database error: {0}")]
    #[diagnostic(code(mediacheck_db::sqlx))]
    Sqlx(#[from] sqlx::Error),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    #[diagnostic(
        code(mediacheck_db::not_found),
        help("Check the database path in your configuration or pass --db-path")
    )]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Invalid data
    #[error("Invalid data: {message}")]
    #[diagnostic(code(mediacheck_db::invalid_data))]
    InvalidData { message: String },
}

impl DbError {
    /// Create a not found error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}
