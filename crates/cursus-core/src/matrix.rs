//! Skill × session coverage matrix.
//!
//! Rows keep every skill, including those with no coverage. Cells keep
//! coverage on canceled sessions so it stays visible, but a row's levels
//! (and therefore its health status) only count active sessions.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{SkillSummary, TermSnapshot};
use crate::enums::{CoverageLevel, SessionStatus};
use crate::health::{CoverageHealth, compute_health};
use crate::ordering::sort_key;

// ---------------------------------------------------------------------------
// Rows and columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MatrixRow {
    pub skill: SkillSummary,
    /// Levels recorded per session id, canceled sessions included.
    pub coverage_by_session: BTreeMap<String, Vec<CoverageLevel>>,
    /// Distinct levels on active sessions, in precedence order.
    pub levels: Vec<CoverageLevel>,
    pub fully_covered: bool,
    pub has_coverage: bool,
}

/// A session column, grouped under its module.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MatrixColumn {
    pub session_id: String,
    pub session_code: String,
    pub module_id: String,
    /// Falls back to the module id when the module is not in the snapshot.
    pub module_code: String,
    pub status: SessionStatus,
}

/// Build one row per skill, in snapshot order.
#[must_use]
pub fn assemble_matrix(snapshot: &TermSnapshot) -> Vec<MatrixRow> {
    let mut by_skill: HashMap<&str, BTreeMap<String, Vec<CoverageLevel>>> = HashMap::new();
    for event in &snapshot.coverages {
        by_skill
            .entry(event.skill_id.as_str())
            .or_default()
            .entry(event.session_id.clone())
            .or_default()
            .push(event.level);
    }

    let canceled = snapshot.canceled_session_ids();

    snapshot
        .skills
        .iter()
        .map(|skill| {
            let coverage_by_session = by_skill.remove(skill.id.as_str()).unwrap_or_default();
            let levels: BTreeSet<CoverageLevel> = coverage_by_session
                .iter()
                .filter(|(session_id, _)| !canceled.contains(*session_id))
                .flat_map(|(_, levels)| levels.iter().copied())
                .collect();
            MatrixRow {
                skill: skill.clone(),
                fully_covered: levels.len() == CoverageLevel::ALL.len(),
                has_coverage: !levels.is_empty(),
                levels: levels.into_iter().collect(),
                coverage_by_session,
            }
        })
        .collect()
}

/// Sessions in term order, labelled with their module.
#[must_use]
pub fn matrix_columns(snapshot: &TermSnapshot) -> Vec<MatrixColumn> {
    let module_codes: HashMap<&str, &str> = snapshot
        .modules
        .iter()
        .map(|m| (m.id.as_str(), m.code.as_str()))
        .collect();

    let mut sessions: Vec<_> = snapshot.sessions.iter().collect();
    sessions.sort_by(|a, b| {
        sort_key(&a.position())
            .cmp(&sort_key(&b.position()))
            .then_with(|| a.code.cmp(&b.code))
    });

    sessions
        .into_iter()
        .map(|s| MatrixColumn {
            session_id: s.id.clone(),
            session_code: s.code.clone(),
            module_id: s.module_id.clone(),
            module_code: module_codes
                .get(s.module_id.as_str())
                .map_or_else(|| s.module_id.clone(), ToString::to_string),
            status: s.status,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Health status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    FullyCovered,
    PartiallyCovered,
    Uncovered,
}

impl HealthStatus {
    #[must_use]
    pub const fn of(row: &MatrixRow) -> Self {
        if row.fully_covered {
            Self::FullyCovered
        } else if row.has_coverage {
            Self::PartiallyCovered
        } else {
            Self::Uncovered
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullyCovered => "fully_covered",
            Self::PartiallyCovered => "partially_covered",
            Self::Uncovered => "uncovered",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HealthBar {
    pub fully_covered: usize,
    pub partially_covered: usize,
    pub uncovered: usize,
    pub total: usize,
}

#[must_use]
pub fn compute_health_bar(rows: &[MatrixRow]) -> HealthBar {
    let mut bar = HealthBar {
        total: rows.len(),
        ..HealthBar::default()
    };
    for row in rows {
        match HealthStatus::of(row) {
            HealthStatus::FullyCovered => bar.fully_covered += 1,
            HealthStatus::PartiallyCovered => bar.partially_covered += 1,
            HealthStatus::Uncovered => bar.uncovered += 1,
        }
    }
    bar
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatrixFilter {
    #[default]
    All,
    /// Rows not fully covered.
    Gaps,
    /// Rows whose skill is in the caller's at-risk set.
    AtRisk,
}

impl MatrixFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Gaps => "gaps",
            Self::AtRisk => "at_risk",
        }
    }
}

impl fmt::Display for MatrixFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatrixFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "gaps" => Ok(Self::Gaps),
            "at_risk" | "at-risk" => Ok(Self::AtRisk),
            other => Err(format!("unknown matrix filter: {other}")),
        }
    }
}

#[must_use]
pub fn filter_rows<'a>(
    rows: &'a [MatrixRow],
    filter: MatrixFilter,
    at_risk_skill_ids: &HashSet<String>,
) -> Vec<&'a MatrixRow> {
    rows.iter()
        .filter(|row| match filter {
            MatrixFilter::All => true,
            MatrixFilter::Gaps => !row.fully_covered,
            MatrixFilter::AtRisk => at_risk_skill_ids.contains(&row.skill.id),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Plan summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PlanSummary {
    pub health_bar: HealthBar,
    pub total_sessions: usize,
    pub scheduled_sessions: usize,
    pub canceled_sessions: usize,
    pub skills_at_risk_from_cancellations: usize,
    pub coverage_health: CoverageHealth,
}

/// Skills that lost a level to an existing cancellation.
///
/// A skill is at risk when some event on a canceled session has no active
/// event for the same skill and level elsewhere. Snapshot skill order.
#[must_use]
pub fn skills_at_risk_from_cancellations(snapshot: &TermSnapshot) -> Vec<String> {
    let canceled = snapshot.canceled_session_ids();
    let active: HashSet<(&str, CoverageLevel)> = snapshot
        .coverages
        .iter()
        .filter(|c| !canceled.contains(&c.session_id))
        .map(|c| (c.skill_id.as_str(), c.level))
        .collect();

    let lost: HashSet<&str> = snapshot
        .coverages
        .iter()
        .filter(|c| canceled.contains(&c.session_id))
        .filter(|c| !active.contains(&(c.skill_id.as_str(), c.level)))
        .map(|c| c.skill_id.as_str())
        .collect();

    let mut ids: Vec<String> = snapshot
        .skills
        .iter()
        .filter(|s| lost.contains(s.id.as_str()))
        .map(|s| s.id.clone())
        .collect();
    // Skills referenced only by coverage still count.
    let listed: HashSet<&str> = snapshot.skills.iter().map(|s| s.id.as_str()).collect();
    let mut extra: Vec<String> = lost
        .into_iter()
        .filter(|id| !listed.contains(id))
        .map(str::to_string)
        .collect();
    extra.sort();
    ids.extend(extra);
    ids
}

#[must_use]
pub fn summarize_plan(snapshot: &TermSnapshot) -> PlanSummary {
    let rows = assemble_matrix(snapshot);
    let canceled = snapshot.canceled_session_ids();
    PlanSummary {
        health_bar: compute_health_bar(&rows),
        total_sessions: snapshot.sessions.len(),
        scheduled_sessions: snapshot.sessions.len().saturating_sub(canceled.len()),
        canceled_sessions: canceled.len(),
        skills_at_risk_from_cancellations: skills_at_risk_from_cancellations(snapshot).len(),
        coverage_health: compute_health(&snapshot.coverages, &snapshot.skill_ids(), &canceled),
    }
}
