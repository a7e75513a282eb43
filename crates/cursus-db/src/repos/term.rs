//! Term structure: terms, modules, sessions, skills, coverage, assessments.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cursus_core::entities::{
    CoverageEvent, GaieEntry, ModuleSummary, SessionSummary, SkillSummary, TermBundle,
};
use cursus_core::enums::{CoverageLevel, ProgressionStage, SessionStatus};
use cursus_core::ids::{PREFIX_COVERAGE, PREFIX_MODULE, PREFIX_SESSION, PREFIX_SKILL, PREFIX_TERM};

use crate::CursusDb;
use crate::error::DatabaseError;
use crate::helpers::{
    format_optional_datetime, get_opt_string, parse_datetime, parse_optional_datetime,
};

/// Assessment type whose rows feed the progression check.
pub const GAIE_ASSESSMENT_TYPE: &str = "gaie";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermRecord {
    pub id: String,
    pub name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new session. Status starts as scheduled.
#[derive(Debug, Clone)]
pub struct NewSession<'a> {
    pub code: &'a str,
    pub title: &'a str,
    pub date: Option<DateTime<Utc>>,
    pub sequence: i64,
}

const TERM_COLS: &str = "id, name, start_date, end_date, created_at";

fn row_to_term(row: &libsql::Row) -> Result<TermRecord, DatabaseError> {
    Ok(TermRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        start_date: parse_optional_datetime(get_opt_string(row, 2)?.as_deref())?,
        end_date: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl CursusDb {
    pub async fn create_term(
        &self,
        name: &str,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<TermRecord, DatabaseError> {
        let id = self.generate_id(PREFIX_TERM).await?;
        let now = Utc::now();
        insert_term(&self.conn, &id, name, start_date, end_date, now).await?;
        Ok(TermRecord {
            id,
            name: name.to_string(),
            start_date,
            end_date,
            created_at: now,
        })
    }

    pub async fn get_term(&self, id: &str) -> Result<TermRecord, DatabaseError> {
        let mut rows = self
            .conn
            .query(&format!("SELECT {TERM_COLS} FROM terms WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_term(&row)
    }

    pub async fn list_terms(&self) -> Result<Vec<TermRecord>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {TERM_COLS} FROM terms ORDER BY created_at, rowid"),
                (),
            )
            .await?;
        let mut terms = Vec::new();
        while let Some(row) = rows.next().await? {
            terms.push(row_to_term(&row)?);
        }
        Ok(terms)
    }

    pub async fn create_module(
        &self,
        term_id: &str,
        code: &str,
        title: &str,
        sequence: i64,
    ) -> Result<ModuleSummary, DatabaseError> {
        let module = ModuleSummary {
            id: self.generate_id(PREFIX_MODULE).await?,
            code: code.to_string(),
            title: title.to_string(),
            sequence,
        };
        insert_module(&self.conn, term_id, &module).await?;
        Ok(module)
    }

    pub async fn create_session(
        &self,
        module_id: &str,
        new: NewSession<'_>,
    ) -> Result<SessionSummary, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT sequence FROM modules WHERE id = ?1", [module_id])
            .await?;
        let module_sequence = rows
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)?
            .get::<i64>(0)?;

        let session = SessionSummary {
            id: self.generate_id(PREFIX_SESSION).await?,
            code: new.code.to_string(),
            title: new.title.to_string(),
            date: new.date,
            module_id: module_id.to_string(),
            module_sequence,
            session_sequence: new.sequence,
            status: SessionStatus::Scheduled,
        };
        insert_session(&self.conn, &session).await?;
        Ok(session)
    }

    /// Create a skill scoped to `term_id`, or a global one when `None`.
    pub async fn create_skill(
        &self,
        term_id: Option<&str>,
        code: &str,
        description: &str,
        category: &str,
    ) -> Result<SkillSummary, DatabaseError> {
        let skill = SkillSummary {
            id: self.generate_id(PREFIX_SKILL).await?,
            code: code.to_string(),
            description: description.to_string(),
            category: category.to_string(),
        };
        insert_skill(&self.conn, term_id, &skill).await?;
        Ok(skill)
    }

    pub async fn add_coverage(
        &self,
        session_id: &str,
        skill_id: &str,
        level: CoverageLevel,
    ) -> Result<String, DatabaseError> {
        let id = self.generate_id(PREFIX_COVERAGE).await?;
        insert_coverage(&self.conn, &id, session_id, skill_id, level, None).await?;
        Ok(id)
    }

    /// Store a whole snapshot bundle as a new term and return it.
    ///
    /// Ids in the bundle are kept. Sessions whose module is not listed get a
    /// placeholder module at their module sequence. Coverage positions are
    /// ignored: events take the position of the session they point at. The
    /// import is atomic.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if any module, session, skill or
    /// assessment id is already stored, and `DatabaseError` if a write fails.
    /// On error nothing is written.
    pub async fn import_bundle(
        &self,
        name: &str,
        bundle: &TermBundle,
    ) -> Result<TermRecord, DatabaseError> {
        let snapshot = &bundle.snapshot;
        let term_id = self.generate_id(PREFIX_TERM).await?;
        let now = Utc::now();

        let mut modules = snapshot.modules.clone();
        for session in &snapshot.sessions {
            if !modules.iter().any(|m| m.id == session.module_id) {
                modules.push(ModuleSummary {
                    id: session.module_id.clone(),
                    code: session.module_id.clone(),
                    title: session.module_id.clone(),
                    sequence: session.module_sequence,
                });
            }
        }

        self.ensure_unused_ids("modules", modules.iter().map(|m| m.id.as_str()))
            .await?;
        self.ensure_unused_ids("sessions", snapshot.sessions.iter().map(|s| s.id.as_str()))
            .await?;
        self.ensure_unused_ids("skills", snapshot.skills.iter().map(|s| s.id.as_str()))
            .await?;
        self.ensure_unused_ids(
            "assessments",
            bundle.gaie.iter().map(|g| g.assessment_id.as_str()),
        )
        .await?;

        let coverage_ids = self.generate_ids(PREFIX_COVERAGE, snapshot.coverages.len()).await?;

        let tx = self.conn.transaction().await?;
        insert_term(&tx, &term_id, name, None, None, now).await?;
        for module in &modules {
            insert_module(&tx, &term_id, module).await?;
        }
        for session in &snapshot.sessions {
            insert_session(&tx, session).await?;
        }
        for skill in &snapshot.skills {
            insert_skill(&tx, Some(&term_id), skill).await?;
        }
        for (id, event) in coverage_ids.iter().zip(&snapshot.coverages) {
            insert_event(&tx, id, event).await?;
        }
        let mut gaie: Vec<&GaieEntry> = bundle.gaie.iter().collect();
        gaie.sort_by_key(|g| (g.sequence, g.date));
        for entry in gaie {
            insert_assessment(
                &tx,
                &entry.assessment_id,
                &term_id,
                &entry.assessment_id,
                GAIE_ASSESSMENT_TYPE,
                Some(entry.progression_stage),
                entry.date,
            )
            .await?;
        }
        tx.commit().await?;

        tracing::info!(
            term_id = %term_id,
            sessions = snapshot.sessions.len(),
            coverages = snapshot.coverages.len(),
            skills = snapshot.skills.len(),
            "imported term"
        );

        Ok(TermRecord {
            id: term_id,
            name: name.to_string(),
            start_date: None,
            end_date: None,
            created_at: now,
        })
    }

    /// Fail if any of `ids` already has a row in `table`.
    async fn ensure_unused_ids<'a>(
        &self,
        table: &'static str,
        ids: impl Iterator<Item = &'a str>,
    ) -> Result<(), DatabaseError> {
        let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
        let mut taken = Vec::new();
        for id in ids {
            let mut rows = self.conn.query(&sql, [id]).await?;
            if rows.next().await?.is_some() {
                taken.push(id.to_string());
            }
        }
        if taken.is_empty() {
            return Ok(());
        }
        Err(DatabaseError::InvalidState(format!(
            "term already imported: {table} {} already stored",
            taken.join(", ")
        )))
    }

    async fn generate_ids(&self, prefix: &str, count: usize) -> Result<Vec<String>, DatabaseError> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.generate_id(prefix).await?);
        }
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// Row writers, shared by single inserts and the import transaction
// ---------------------------------------------------------------------------

async fn insert_term(
    conn: &libsql::Connection,
    id: &str,
    name: &str,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!("INSERT INTO terms ({TERM_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
        libsql::params![
            id,
            name,
            format_optional_datetime(start_date),
            format_optional_datetime(end_date),
            created_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

async fn insert_module(
    conn: &libsql::Connection,
    term_id: &str,
    module: &ModuleSummary,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO modules (id, term_id, code, title, sequence) VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            module.id.as_str(),
            term_id,
            module.code.as_str(),
            module.title.as_str(),
            module.sequence
        ],
    )
    .await?;
    Ok(())
}

async fn insert_session(
    conn: &libsql::Connection,
    session: &SessionSummary,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO sessions (id, module_id, code, title, date, sequence, status, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        libsql::params![
            session.id.as_str(),
            session.module_id.as_str(),
            session.code.as_str(),
            session.title.as_str(),
            format_optional_datetime(session.date),
            session.session_sequence,
            session.status.as_str(),
            Utc::now().to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

async fn insert_skill(
    conn: &libsql::Connection,
    term_id: Option<&str>,
    skill: &SkillSummary,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO skills (id, term_id, is_global, code, description, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            skill.id.as_str(),
            term_id,
            i64::from(term_id.is_none()),
            skill.code.as_str(),
            skill.description.as_str(),
            skill.category.as_str()
        ],
    )
    .await?;
    Ok(())
}

async fn insert_event(
    conn: &libsql::Connection,
    id: &str,
    event: &CoverageEvent,
) -> Result<(), DatabaseError> {
    insert_coverage(conn, id, &event.session_id, &event.skill_id, event.level, None).await
}

pub(crate) async fn insert_coverage(
    conn: &libsql::Connection,
    id: &str,
    session_id: &str,
    skill_id: &str,
    level: CoverageLevel,
    redistributed_from: Option<&str>,
) -> Result<(), DatabaseError> {
    let redistributed_at = redistributed_from.map(|_| Utc::now().to_rfc3339());
    conn.execute(
        "INSERT INTO coverages (id, session_id, skill_id, level, redistributed_from, redistributed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            id,
            session_id,
            skill_id,
            level.as_str(),
            redistributed_from,
            redistributed_at
        ],
    )
    .await?;
    Ok(())
}

async fn insert_assessment(
    conn: &libsql::Connection,
    id: &str,
    term_id: &str,
    title: &str,
    assessment_type: &str,
    progression_stage: Option<ProgressionStage>,
    due_date: Option<DateTime<Utc>>,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO assessments (id, term_id, title, assessment_type, progression_stage, due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            id,
            term_id,
            title,
            assessment_type,
            progression_stage.map(ProgressionStage::as_str),
            format_optional_datetime(due_date)
        ],
    )
    .await?;
    Ok(())
}
