//! Relocation planning for canceled sessions.
//!
//! A planner proposes where the uniquely covered skills of a canceled
//! session could be taught instead. Handlers receive the planner as a
//! `&dyn RelocationPlanner`; suggestions are always re-checked with
//! `validate_redistribution` before they are shown.

use serde::Serialize;

use cursus_core::entities::{Relocation, TermSnapshot};
use cursus_core::whatif::CancellationImpact;

mod heuristic;

pub use heuristic::HeuristicPlanner;

/// Everything a planner sees.
#[derive(Clone, Copy, Debug)]
pub struct PlannerRequest<'a> {
    pub snapshot: &'a TermSnapshot,
    pub impact: &'a CancellationImpact,
    /// Overrides the planner's own cap when set.
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelocationSuggestion {
    pub relocation: Relocation,
    pub target_session_code: String,
    /// 0.0 to 1.0; higher means a closer match to the canceled session.
    pub confidence: f64,
    pub rationale: String,
}

pub trait RelocationPlanner {
    fn suggest(&self, request: &PlannerRequest<'_>) -> Vec<RelocationSuggestion>;
}
