//! Cancellation what-if analysis.
//!
//! Everything here works on a borrowed [`TermSnapshot`] and returns fresh
//! values; the snapshot is never modified.

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CoverageEvent, Relocation, TermSnapshot};
use crate::enums::CoverageLevel;
use crate::health::{CoverageHealth, compute_health};
use crate::issues::{ValidationIssue, ViolationKey};
use crate::rules::validate_all_ordering;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Another active session that still covers an at-risk skill.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OtherSession {
    pub session_id: String,
    pub session_code: String,
    pub level: CoverageLevel,
}

/// One coverage event lost by the cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AtRiskSkill {
    pub skill_id: String,
    pub skill_code: String,
    pub level: CoverageLevel,
    /// No other active session covers this skill at this level.
    pub unique_coverage: bool,
    /// Other active sessions covering the skill at any level.
    pub other_sessions: Vec<OtherSession>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CancellationImpact {
    pub canceled_session_id: String,
    pub affected_coverages: Vec<CoverageEvent>,
    pub at_risk_skills: Vec<AtRiskSkill>,
    pub health_before: CoverageHealth,
    pub health_after: CoverageHealth,
    /// Violations present after the cancellation but not before.
    pub new_violations: Vec<ValidationIssue>,
}

impl CancellationImpact {
    /// Number of lost events that had no other active coverage.
    #[must_use]
    pub fn unique_at_risk_count(&self) -> usize {
        self.at_risk_skills
            .iter()
            .filter(|s| s.unique_coverage)
            .count()
    }

    /// Change in fully covered skills; negative when coverage is lost.
    #[must_use]
    pub fn fully_covered_delta(&self) -> i64 {
        count_as_i64(self.health_after.fully_covered)
            - count_as_i64(self.health_before.fully_covered)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScenarioComparison {
    pub scenario_a: CancellationImpact,
    pub scenario_b: CancellationImpact,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Simulate removing `session_id` from the plan.
///
/// Sessions already canceled are inactive on both sides of the comparison.
/// An id with no coverage (or no session) yields empty affected and at-risk
/// lists and identical health.
#[must_use]
pub fn simulate_cancellation(snapshot: &TermSnapshot, session_id: &str) -> CancellationImpact {
    let all_skill_ids = snapshot.skill_ids();
    let existing_canceled = snapshot.canceled_session_ids();
    let mut canceled_after = existing_canceled.clone();
    canceled_after.insert(session_id.to_string());

    let session_codes: HashMap<&str, &str> = snapshot
        .sessions
        .iter()
        .map(|s| (s.id.as_str(), s.code.as_str()))
        .collect();

    let affected_coverages: Vec<CoverageEvent> = snapshot
        .coverages
        .iter()
        .filter(|c| c.session_id == session_id)
        .cloned()
        .collect();

    // Active events other than the target's, in snapshot order.
    let others: Vec<&CoverageEvent> = snapshot
        .coverages
        .iter()
        .filter(|c| !canceled_after.contains(&c.session_id))
        .collect();

    let at_risk_skills = affected_coverages
        .iter()
        .map(|affected| {
            let same_skill = others.iter().filter(|c| c.skill_id == affected.skill_id);
            let unique_coverage = !same_skill.clone().any(|c| c.level == affected.level);
            let other_sessions = same_skill
                .map(|c| OtherSession {
                    session_id: c.session_id.clone(),
                    session_code: session_codes
                        .get(c.session_id.as_str())
                        .map_or_else(|| c.session_id.clone(), ToString::to_string),
                    level: c.level,
                })
                .collect();
            AtRiskSkill {
                skill_id: affected.skill_id.clone(),
                skill_code: snapshot
                    .skill(&affected.skill_id)
                    .map_or_else(|| affected.skill_id.clone(), |s| s.code.clone()),
                level: affected.level,
                unique_coverage,
                other_sessions,
            }
        })
        .collect();

    let health_before = compute_health(&snapshot.coverages, &all_skill_ids, &existing_canceled);
    let health_after = compute_health(&snapshot.coverages, &all_skill_ids, &canceled_after);

    let before = validate_all_ordering(&snapshot.active_coverages(&existing_canceled));
    let after = validate_all_ordering(&snapshot.active_coverages(&canceled_after));

    CancellationImpact {
        canceled_session_id: session_id.to_string(),
        affected_coverages,
        at_risk_skills,
        health_before,
        health_after,
        new_violations: new_violations(&before, after),
    }
}

/// Re-validate ordering after relocating a canceled session's coverage.
///
/// Every event of `canceled_session_id` is dropped and one event is
/// synthesized per relocation at the target session's position. A target
/// missing from the snapshot is placed undated at sequence 0. Returns an
/// empty list when the canceled session is not in the snapshot.
#[must_use]
pub fn validate_redistribution(
    snapshot: &TermSnapshot,
    canceled_session_id: &str,
    relocations: &[Relocation],
) -> Vec<ValidationIssue> {
    if snapshot.session(canceled_session_id).is_none() {
        return Vec::new();
    }

    let mut events: Vec<CoverageEvent> = snapshot
        .coverages
        .iter()
        .filter(|c| c.session_id != canceled_session_id)
        .cloned()
        .collect();

    events.extend(relocations.iter().map(|r| {
        let target = snapshot.session(&r.to_session_id);
        CoverageEvent {
            session_id: r.to_session_id.clone(),
            skill_id: r.skill_id.clone(),
            level: r.level,
            session_date: target.and_then(|s| s.date),
            session_sequence: target.map_or(0, |s| s.session_sequence),
            module_sequence: target.map_or(0, |s| s.module_sequence),
        }
    }));

    validate_all_ordering(&events)
}

/// Run the cancellation simulator for two candidate sessions.
#[must_use]
pub fn compare_scenarios(
    snapshot: &TermSnapshot,
    session_a: &str,
    session_b: &str,
) -> ScenarioComparison {
    ScenarioComparison {
        scenario_a: simulate_cancellation(snapshot, session_a),
        scenario_b: simulate_cancellation(snapshot, session_b),
    }
}

/// Issues in `after` whose key does not occur in `before`.
///
/// Keys ignore the message text, so a reworded issue is not new.
#[must_use]
pub fn new_violations(
    before: &[ValidationIssue],
    after: Vec<ValidationIssue>,
) -> Vec<ValidationIssue> {
    let known: HashSet<ViolationKey> = before.iter().map(ValidationIssue::key).collect();
    after
        .into_iter()
        .filter(|v| !known.contains(&v.key()))
        .collect()
}

fn count_as_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
