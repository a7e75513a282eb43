//! Whole-term validation report.
//!
//! Bundles the ordering validator, the hygiene checks and the GAIE
//! progression check into one result split by severity. Coverage on
//! canceled sessions is ignored.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CoverageEvent, GaieEntry, TermSnapshot};
use crate::enums::Severity;
use crate::issues::ValidationIssue;
use crate::rules::{
    distinct_skill_ids, find_orphan_skills, find_unassessed_skills, validate_all_ordering,
    validate_gaie_progression,
};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReportSummary {
    pub total_skills: usize,
    /// Distinct sessions carrying at least one active event.
    pub total_sessions: usize,
    pub total_coverage_entries: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TermReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub info: Vec<ValidationIssue>,
    pub summary: ReportSummary,
}

impl TermReport {
    /// A term is clean when it has no errors. Warnings and info do not count.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// All issues in severity order.
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.info.iter())
    }
}

/// Validate one term.
///
/// The skill universe is every skill with an active event, in first
/// appearance order, followed by the remaining skills of the snapshot.
#[must_use]
pub fn validate_term(snapshot: &TermSnapshot, gaie: &[GaieEntry]) -> TermReport {
    let events = snapshot.active_coverages(&snapshot.canceled_session_ids());

    let mut skill_ids: Vec<String> = distinct_skill_ids(&events)
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut known: HashSet<String> = skill_ids.iter().cloned().collect();
    for skill in &snapshot.skills {
        if known.insert(skill.id.clone()) {
            skill_ids.push(skill.id.clone());
        }
    }

    let mut issues = validate_all_ordering(&events);
    issues.extend(validate_gaie_progression(gaie));
    issues.extend(find_unassessed_skills(&events));
    issues.extend(modules_without_skills(snapshot, &events));
    issues.extend(find_orphan_skills(&skill_ids, &events));

    let mut report = TermReport::default();
    for issue in issues {
        match issue.severity() {
            Severity::Error => report.errors.push(issue),
            Severity::Warning => report.warnings.push(issue),
            Severity::Info => report.info.push(issue),
        }
    }

    let sessions: HashSet<&str> = events.iter().map(|e| e.session_id.as_str()).collect();
    report.summary = ReportSummary {
        total_skills: skill_ids.len(),
        total_sessions: sessions.len(),
        total_coverage_entries: events.len(),
        error_count: report.errors.len(),
        warning_count: report.warnings.len(),
        info_count: report.info.len(),
    };
    report
}

fn modules_without_skills(
    snapshot: &TermSnapshot,
    events: &[CoverageEvent],
) -> Vec<ValidationIssue> {
    let covered_sessions: HashSet<&str> = events.iter().map(|e| e.session_id.as_str()).collect();
    let covered_modules: HashSet<&str> = snapshot
        .sessions
        .iter()
        .filter(|s| covered_sessions.contains(s.id.as_str()))
        .map(|s| s.module_id.as_str())
        .collect();

    let mut modules: Vec<_> = snapshot
        .modules
        .iter()
        .filter(|m| !covered_modules.contains(m.id.as_str()))
        .collect();
    modules.sort_by_key(|m| m.sequence);
    modules
        .into_iter()
        .map(|m| ValidationIssue::module_no_skills(&m.id, &m.code, &m.title))
        .collect()
}
