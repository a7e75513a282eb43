//! # cursus-db
//!
//! libSQL term store for Cursus.
//!
//! Persists terms, modules, sessions, skills, coverage and assessments, and
//! reads them back as the immutable [`TermSnapshot`] the engine works on.
//! Approved changes (cancellations with redistribution, session moves) are
//! applied here inside a single transaction.
//!
//! [`TermSnapshot`]: cursus_core::entities::TermSnapshot

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

use cursus_core::ids::format_id;
use error::DatabaseError;
use libsql::Builder;

/// Handle to one local term store.
pub struct CursusDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl CursusDb {
    /// Open (or create) a local store at `path`. `":memory:"` is accepted.
    ///
    /// Runs migrations on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file cannot be opened or a migration
    /// fails.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Per-connection in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let store = Self { db, conn };
        store.run_migrations().await?;
        tracing::debug!(path, "term store opened");
        Ok(store)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed id, e.g. `"ses-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT lower(hex(randomblob(4)))",
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(format_id(prefix, &row.get::<String>(0)?))
    }
}
