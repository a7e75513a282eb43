use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::CoverageEvent;
use crate::enums::CoverageLevel;
use crate::rules::validate_all_ordering;

/// Aggregate coverage counts over the active part of a plan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CoverageHealth {
    pub total_skills: usize,
    pub fully_introduced: usize,
    pub fully_practiced: usize,
    pub fully_assessed: usize,
    /// Skills reached at all three levels.
    pub fully_covered: usize,
    pub ordering_violations: usize,
}

/// Compute health over `events`, ignoring sessions in `excluded_session_ids`.
///
/// Counts iterate `all_skill_ids`, so events for skills outside that list
/// only contribute to `ordering_violations`.
#[must_use]
pub fn compute_health(
    events: &[CoverageEvent],
    all_skill_ids: &[String],
    excluded_session_ids: &HashSet<String>,
) -> CoverageHealth {
    let active: Vec<CoverageEvent> = events
        .iter()
        .filter(|e| !excluded_session_ids.contains(&e.session_id))
        .cloned()
        .collect();

    let levels = levels_by_skill(&active);

    let mut health = CoverageHealth {
        total_skills: all_skill_ids.len(),
        ..CoverageHealth::default()
    };
    for skill_id in all_skill_ids {
        let Some(set) = levels.get(skill_id.as_str()) else {
            continue;
        };
        let introduced = set.contains(&CoverageLevel::Introduced);
        let practiced = set.contains(&CoverageLevel::Practiced);
        let assessed = set.contains(&CoverageLevel::Assessed);
        health.fully_introduced += usize::from(introduced);
        health.fully_practiced += usize::from(practiced);
        health.fully_assessed += usize::from(assessed);
        health.fully_covered += usize::from(introduced && practiced && assessed);
    }

    health.ordering_violations = validate_all_ordering(&active).len();
    health
}

pub(crate) fn levels_by_skill(events: &[CoverageEvent]) -> HashMap<&str, HashSet<CoverageLevel>> {
    let mut levels: HashMap<&str, HashSet<CoverageLevel>> = HashMap::new();
    for event in events {
        levels
            .entry(event.skill_id.as_str())
            .or_default()
            .insert(event.level);
    }
    levels
}
