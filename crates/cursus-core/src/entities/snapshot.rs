use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    CoverageEvent, GaieEntry, ModuleSummary, Relocation, SessionSummary, SkillSummary,
};
use crate::errors::CoreError;

/// The complete, immutable read of one term handed to every engine call.
///
/// `skills` includes globally shared skills as well as term-scoped ones.
/// `modules` is optional and only feeds the module-level hygiene warning and
/// matrix grouping.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TermSnapshot {
    pub sessions: Vec<SessionSummary>,
    pub coverages: Vec<CoverageEvent>,
    pub skills: Vec<SkillSummary>,
    #[serde(default)]
    pub modules: Vec<ModuleSummary>,
}

impl TermSnapshot {
    #[must_use]
    pub fn session(&self, id: &str) -> Option<&SessionSummary> {
        self.sessions.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn skill(&self, id: &str) -> Option<&SkillSummary> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Every skill id in snapshot order.
    #[must_use]
    pub fn skill_ids(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.id.clone()).collect()
    }

    /// Ids of sessions already canceled in the persisted plan.
    #[must_use]
    pub fn canceled_session_ids(&self) -> HashSet<String> {
        self.sessions
            .iter()
            .filter(|s| s.is_canceled())
            .map(|s| s.id.clone())
            .collect()
    }

    /// Events on sessions that are not in `excluded`.
    #[must_use]
    pub fn active_coverages(&self, excluded: &HashSet<String>) -> Vec<CoverageEvent> {
        self.coverages
            .iter()
            .filter(|c| !excluded.contains(&c.session_id))
            .cloned()
            .collect()
    }

    /// The plan as it stands today: coverage on already canceled sessions is
    /// dropped, everything else is kept.
    #[must_use]
    pub fn active_view(&self) -> Self {
        Self {
            coverages: self.active_coverages(&self.canceled_session_ids()),
            ..self.clone()
        }
    }

    /// Resolve a session id or fail with `NotFound`.
    ///
    /// Boundary helper for collaborators; engine operations assume their ids resolve.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if no session has this id.
    pub fn require_session(&self, id: &str) -> Result<&SessionSummary, CoreError> {
        self.session(id)
            .ok_or_else(|| CoreError::session_not_found(id))
    }

    /// Check that every relocation lands on an existing, active session other
    /// than the one being canceled.
    ///
    /// All problems are collected into one message.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the canceled session is unknown and
    /// `CoreError::Validation` listing every invalid target otherwise.
    pub fn check_relocation_targets(
        &self,
        canceled_session_id: &str,
        relocations: &[Relocation],
    ) -> Result<(), CoreError> {
        self.require_session(canceled_session_id)?;

        let mut seen = HashSet::new();
        let mut problems = Vec::new();
        for relocation in relocations {
            let target = relocation.to_session_id.as_str();
            if !seen.insert(target) {
                continue;
            }
            match self.session(target) {
                None => problems.push(format!("target session not found: {target}")),
                Some(_) if target == canceled_session_id => problems.push(format!(
                    "cannot redistribute to the session being canceled: {target}"
                )),
                Some(session) if session.is_canceled() => {
                    problems.push(format!("target session is canceled: {target}"));
                }
                Some(_) => {}
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(problems.join("; ")))
        }
    }
}

/// A snapshot file as exchanged with the CLI: the snapshot itself plus the
/// term's GAIE assessments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TermBundle {
    #[serde(flatten)]
    pub snapshot: TermSnapshot,
    #[serde(default)]
    pub gaie: Vec<GaieEntry>,
}
