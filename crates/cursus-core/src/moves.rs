use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CoverageEvent, TemporalPosition};
use crate::issues::ValidationIssue;
use crate::rules::{distinct_skill_ids, validate_all_ordering};

/// Impact of relocating one session to a new position in the term.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MoveImpact {
    pub moved_session_id: String,
    /// Distinct skills touched by the session, first-appearance order.
    pub affected_skill_ids: Vec<String>,
    /// The session's own events at their original positions.
    pub coverage_at_risk: Vec<CoverageEvent>,
    /// Every violation in the hypothetical plan, not only new ones.
    pub new_violations: Vec<ValidationIssue>,
}

/// Revalidate the plan as if `session_id` sat at `new_position`.
#[must_use]
pub fn compute_move_impact(
    session_id: &str,
    new_position: TemporalPosition,
    events: &[CoverageEvent],
) -> MoveImpact {
    let coverage_at_risk: Vec<CoverageEvent> = events
        .iter()
        .filter(|e| e.session_id == session_id)
        .cloned()
        .collect();

    let affected_skill_ids = distinct_skill_ids(&coverage_at_risk)
        .into_iter()
        .map(str::to_string)
        .collect();

    let moved: Vec<CoverageEvent> = events
        .iter()
        .map(|e| {
            if e.session_id == session_id {
                e.with_position(new_position)
            } else {
                e.clone()
            }
        })
        .collect();

    MoveImpact {
        moved_session_id: session_id.to_string(),
        affected_skill_ids,
        coverage_at_risk,
        new_violations: validate_all_ordering(&moved),
    }
}
