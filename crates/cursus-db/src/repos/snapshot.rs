//! Read a stored term back as an engine snapshot.
//!
//! Every call reads fresh rows; nothing is cached between calls.

use cursus_core::entities::{
    CoverageEvent, GaieEntry, ModuleSummary, SessionSummary, SkillSummary, TermBundle,
    TermSnapshot,
};
use cursus_core::errors::CoreError;

use crate::CursusDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum, parse_optional_datetime};
use crate::repos::term::GAIE_ASSESSMENT_TYPE;

pub(crate) const SESSION_COLS: &str = "s.id, s.code, s.title, s.date, s.module_id, m.sequence, s.sequence, s.status";

pub(crate) fn row_to_session(row: &libsql::Row) -> Result<SessionSummary, DatabaseError> {
    Ok(SessionSummary {
        id: row.get(0)?,
        code: row.get(1)?,
        title: row.get(2)?,
        date: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        module_id: row.get(4)?,
        module_sequence: row.get::<i64>(5)?,
        session_sequence: row.get::<i64>(6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
    })
}

fn row_to_event(row: &libsql::Row) -> Result<CoverageEvent, DatabaseError> {
    Ok(CoverageEvent {
        session_id: row.get(0)?,
        skill_id: row.get(1)?,
        level: parse_enum(&row.get::<String>(2)?)?,
        session_date: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        session_sequence: row.get::<i64>(4)?,
        module_sequence: row.get::<i64>(5)?,
    })
}

impl CursusDb {
    /// Load every session, coverage event, skill and module of a term.
    ///
    /// Skills include global skills shared by all terms.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `NotFound` if the term does not
    /// exist, or `DatabaseError` if a row fails to parse.
    pub async fn load_term_snapshot(&self, term_id: &str) -> Result<TermSnapshot, DatabaseError> {
        self.require_term(term_id).await?;

        let snapshot = TermSnapshot {
            sessions: self.load_sessions(term_id).await?,
            coverages: self.load_coverage_events(term_id).await?,
            skills: self.load_skills(term_id).await?,
            modules: self.load_modules(term_id).await?,
        };
        tracing::debug!(
            term_id,
            sessions = snapshot.sessions.len(),
            coverages = snapshot.coverages.len(),
            skills = snapshot.skills.len(),
            "loaded term snapshot"
        );
        Ok(snapshot)
    }

    /// GAIE assessments of a term in creation order, sequenced from 0.
    ///
    /// Assessments without a progression stage are skipped.
    pub async fn load_gaie_entries(&self, term_id: &str) -> Result<Vec<GaieEntry>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, progression_stage, due_date FROM assessments
                 WHERE term_id = ?1 AND assessment_type = ?2 AND progression_stage IS NOT NULL
                 ORDER BY created_at, rowid",
                libsql::params![term_id, GAIE_ASSESSMENT_TYPE],
            )
            .await?;
        let mut entries = Vec::new();
        let mut sequence = 0_i64;
        while let Some(row) = rows.next().await? {
            entries.push(GaieEntry {
                assessment_id: row.get(0)?,
                progression_stage: parse_enum(&row.get::<String>(1)?)?,
                date: parse_optional_datetime(get_opt_string(&row, 2)?.as_deref())?,
                sequence,
            });
            sequence += 1;
        }
        Ok(entries)
    }

    pub async fn load_term_bundle(&self, term_id: &str) -> Result<TermBundle, DatabaseError> {
        Ok(TermBundle {
            snapshot: self.load_term_snapshot(term_id).await?,
            gaie: self.load_gaie_entries(term_id).await?,
        })
    }

    /// The term a session belongs to.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `NotFound` for an unknown session.
    pub async fn term_id_for_session(&self, session_id: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT m.term_id FROM sessions s JOIN modules m ON m.id = s.module_id WHERE s.id = ?1",
                [session_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<String>(0)?),
            None => Err(CoreError::session_not_found(session_id).into()),
        }
    }

    async fn require_term(&self, term_id: &str) -> Result<(), DatabaseError> {
        match self.get_term(term_id).await {
            Ok(_) => Ok(()),
            Err(DatabaseError::NoResult) => Err(CoreError::NotFound {
                entity_type: "term".to_string(),
                id: term_id.to_string(),
            }
            .into()),
            Err(e) => Err(e),
        }
    }

    async fn load_sessions(&self, term_id: &str) -> Result<Vec<SessionSummary>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT {SESSION_COLS} FROM sessions s JOIN modules m ON m.id = s.module_id
                     WHERE m.term_id = ?1 ORDER BY m.sequence, s.sequence, s.rowid"
                ),
                [term_id],
            )
            .await?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        Ok(sessions)
    }

    async fn load_coverage_events(
        &self,
        term_id: &str,
    ) -> Result<Vec<CoverageEvent>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT c.session_id, c.skill_id, c.level, s.date, s.sequence, m.sequence
                 FROM coverages c
                 JOIN sessions s ON s.id = c.session_id
                 JOIN modules m ON m.id = s.module_id
                 WHERE m.term_id = ?1
                 ORDER BY m.sequence, s.sequence, s.rowid, c.rowid",
                [term_id],
            )
            .await?;
        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(row_to_event(&row)?);
        }
        Ok(events)
    }

    async fn load_skills(&self, term_id: &str) -> Result<Vec<SkillSummary>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, code, description, category FROM skills
                 WHERE term_id = ?1 OR is_global = 1
                 ORDER BY is_global, rowid",
                [term_id],
            )
            .await?;
        let mut skills = Vec::new();
        while let Some(row) = rows.next().await? {
            skills.push(SkillSummary {
                id: row.get(0)?,
                code: row.get(1)?,
                description: row.get(2)?,
                category: row.get(3)?,
            });
        }
        Ok(skills)
    }

    async fn load_modules(&self, term_id: &str) -> Result<Vec<ModuleSummary>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, code, title, sequence FROM modules WHERE term_id = ?1 ORDER BY sequence, rowid",
                [term_id],
            )
            .await?;
        let mut modules = Vec::new();
        while let Some(row) = rows.next().await? {
            modules.push(ModuleSummary {
                id: row.get(0)?,
                code: row.get(1)?,
                title: row.get(2)?,
                sequence: row.get::<i64>(3)?,
            });
        }
        Ok(modules)
    }
}
