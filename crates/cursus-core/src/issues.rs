//! Structured validation findings.
//!
//! The validators never fail; every breach or hygiene signal becomes a
//! `ValidationIssue`. Ordering issues always carry the offending event's
//! `skill_id` and `session_id`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::CoverageEvent;
use crate::enums::{IssueKind, Severity};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
}

/// Canonical identity of a violation occurrence: `(type, skill, session)`.
///
/// Two issues with the same key are the same occurrence, whatever their
/// message or position in a result list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViolationKey {
    pub kind: IssueKind,
    pub skill_id: Option<String>,
    pub session_id: Option<String>,
}

impl ValidationIssue {
    /// An ordering breach raised by `event`.
    #[must_use]
    pub fn ordering(kind: IssueKind, event: &CoverageEvent) -> Self {
        let skill = &event.skill_id;
        let message = match kind {
            IssueKind::PracticedBeforeIntroduced => {
                format!("Skill {skill} is practiced before being introduced")
            }
            IssueKind::AssessedBeforeIntroduced => {
                format!("Skill {skill} is assessed before being introduced")
            }
            IssueKind::AssessedBeforePracticed => {
                format!("Skill {skill} is assessed before being practiced")
            }
            other => format!("Skill {skill}: {other}"),
        };
        Self {
            kind,
            message,
            skill_id: Some(event.skill_id.clone()),
            session_id: Some(event.session_id.clone()),
            module_id: None,
        }
    }

    #[must_use]
    pub fn orphan_skill(skill_id: &str) -> Self {
        Self {
            kind: IssueKind::OrphanSkill,
            message: format!("Skill {skill_id} has no coverage in any session"),
            skill_id: Some(skill_id.to_string()),
            session_id: None,
            module_id: None,
        }
    }

    #[must_use]
    pub fn skill_not_assessed(skill_id: &str) -> Self {
        Self {
            kind: IssueKind::SkillNotAssessed,
            message: format!("Skill {skill_id} has no assessment"),
            skill_id: Some(skill_id.to_string()),
            session_id: None,
            module_id: None,
        }
    }

    #[must_use]
    pub fn gaie_progression_broken(assessment_id: &str, stage: &str) -> Self {
        Self {
            kind: IssueKind::GaieProgressionBroken,
            message: format!(
                "GAIE {assessment_id} has progression stage \"{stage}\" which is out of order"
            ),
            skill_id: None,
            session_id: None,
            module_id: None,
        }
    }

    #[must_use]
    pub fn module_no_skills(module_id: &str, code: &str, title: &str) -> Self {
        Self {
            kind: IssueKind::ModuleNoSkills,
            message: format!("Module \"{title}\" ({code}) covers no skills"),
            skill_id: None,
            session_id: None,
            module_id: Some(module_id.to_string()),
        }
    }

    #[must_use]
    pub fn key(&self) -> ViolationKey {
        ViolationKey {
            kind: self.kind,
            skill_id: self.skill_id.clone(),
            session_id: self.session_id.clone(),
        }
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }
}
