//! Database error types for cursus-db.

use cursus_core::errors::CoreError;
use thiserror::Error;

/// Errors from term store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A stored row does not allow the requested change.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The request was rejected by a boundary check.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
