//! Apply approved plan changes: cancellations and moves.
//!
//! Callers run the engine first (redistribution check, move impact) and only
//! then apply. Each change is one transaction.

use chrono::{DateTime, Utc};

use cursus_core::entities::{Relocation, SessionSummary, TemporalPosition};
use cursus_core::enums::SessionStatus;
use cursus_core::errors::CoreError;
use cursus_core::ids::PREFIX_COVERAGE;

use crate::CursusDb;
use crate::error::DatabaseError;
use crate::helpers::format_optional_datetime;
use crate::repos::snapshot::{SESSION_COLS, row_to_session};
use crate::repos::term::insert_coverage;

/// A requested change of a session's place in the term.
///
/// `None` fields keep their current value. `date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMove {
    pub date: Option<Option<DateTime<Utc>>>,
    pub module_id: Option<String>,
    pub sequence: Option<i64>,
}

impl SessionMove {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.date.is_none() && self.module_id.is_none() && self.sequence.is_none()
    }
}

impl CursusDb {
    pub async fn get_session(&self, session_id: &str) -> Result<SessionSummary, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT {SESSION_COLS} FROM sessions s JOIN modules m ON m.id = s.module_id WHERE s.id = ?1"
                ),
                [session_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_session(&row),
            None => Err(CoreError::session_not_found(session_id).into()),
        }
    }

    /// Mark a session canceled and add the redistributed coverage.
    ///
    /// Each relocation becomes a coverage row on its target session with
    /// `redistributed_from` pointing at the canceled session. The original
    /// coverage rows are kept. Targets must already have been checked.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the session cannot move to
    /// canceled from its current status, `DatabaseError::Core` if it does
    /// not exist, or `DatabaseError` if a write fails. On error nothing is
    /// written.
    pub async fn cancel_session(
        &self,
        session_id: &str,
        reason: Option<&str>,
        relocations: &[Relocation],
    ) -> Result<SessionSummary, DatabaseError> {
        let session = self.get_session(session_id).await?;
        if !session.status.can_transition_to(SessionStatus::Canceled) {
            return Err(DatabaseError::InvalidState(format!(
                "session {session_id} is {} and cannot be canceled",
                session.status
            )));
        }

        let mut coverage_ids = Vec::with_capacity(relocations.len());
        for _ in relocations {
            coverage_ids.push(self.generate_id(PREFIX_COVERAGE).await?);
        }

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction().await?;
        tx.execute(
            "UPDATE sessions SET status = ?1, canceled_at = ?2, canceled_reason = ?3, updated_at = ?2
             WHERE id = ?4",
            libsql::params![SessionStatus::Canceled.as_str(), now.as_str(), reason, session_id],
        )
        .await?;
        for (id, relocation) in coverage_ids.iter().zip(relocations) {
            insert_coverage(
                &tx,
                id,
                &relocation.to_session_id,
                &relocation.skill_id,
                relocation.level,
                Some(session_id),
            )
            .await?;
        }
        tx.commit().await?;

        tracing::info!(
            session_id,
            redistributed = relocations.len(),
            "canceled session"
        );
        self.get_session(session_id).await
    }

    /// Where `change` would put the session, without writing anything.
    ///
    /// A new module contributes its sequence; omitted fields keep the
    /// session's current coordinates.
    pub async fn resolve_move(
        &self,
        session_id: &str,
        change: &SessionMove,
    ) -> Result<TemporalPosition, DatabaseError> {
        let session = self.get_session(session_id).await?;
        let module_sequence = match &change.module_id {
            Some(module_id) => self.module_sequence(module_id).await?,
            None => session.module_sequence,
        };
        Ok(TemporalPosition {
            date: change.date.unwrap_or(session.date),
            module_sequence,
            session_sequence: change.sequence.unwrap_or(session.session_sequence),
        })
    }

    /// Write a session's new date, module or sequence and mark it moved.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for a canceled session and
    /// `DatabaseError::Core` for an unknown session or module. An empty
    /// change writes nothing.
    pub async fn move_session(
        &self,
        session_id: &str,
        change: &SessionMove,
    ) -> Result<SessionSummary, DatabaseError> {
        let current = self.get_session(session_id).await?;
        if change.is_empty() {
            return Ok(current);
        }
        if !current.status.can_transition_to(SessionStatus::Moved) {
            return Err(DatabaseError::InvalidState(format!(
                "session {session_id} is {} and cannot be moved",
                current.status
            )));
        }
        if let Some(module_id) = &change.module_id {
            // Fails early with a clear error instead of a foreign key violation.
            self.module_sequence(module_id).await?;
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(date) = change.date {
            sets.push(format!("date = ?{idx}"));
            params.push(format_optional_datetime(date).map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(module_id) = &change.module_id {
            sets.push(format!("module_id = ?{idx}"));
            params.push(module_id.clone().into());
            idx += 1;
        }
        if let Some(sequence) = change.sequence {
            sets.push(format!("sequence = ?{idx}"));
            params.push(sequence.into());
            idx += 1;
        }
        sets.push(format!("status = ?{idx}"));
        params.push(SessionStatus::Moved.as_str().into());
        idx += 1;
        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(session_id.into());
        let sql = format!("UPDATE sessions SET {} WHERE id = ?{idx}", sets.join(", "));
        self.conn.execute(&sql, libsql::params_from_iter(params)).await?;

        tracing::info!(session_id, "moved session");
        self.get_session(session_id).await
    }

    async fn module_sequence(&self, module_id: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT sequence FROM modules WHERE id = ?1", [module_id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?),
            None => Err(CoreError::NotFound {
                entity_type: "module".to_string(),
                id: module_id.to_string(),
            }
            .into()),
        }
    }
}
