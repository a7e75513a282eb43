use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CoverageLevel;

/// Where a session sits in the term: module order, session order within the
/// module, and an optional calendar date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct TemporalPosition {
    pub date: Option<DateTime<Utc>>,
    pub module_sequence: i64,
    pub session_sequence: i64,
}

/// One fact: a skill was covered at a level during a session.
///
/// The temporal coordinates are copied from the owning session when the
/// snapshot is built. Hypothetical moves produce new events via
/// [`CoverageEvent::with_position`]; existing events are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CoverageEvent {
    pub session_id: String,
    pub skill_id: String,
    pub level: CoverageLevel,
    /// `None` when the session is unscheduled.
    pub session_date: Option<DateTime<Utc>>,
    pub session_sequence: i64,
    pub module_sequence: i64,
}

impl CoverageEvent {
    #[must_use]
    pub const fn position(&self) -> TemporalPosition {
        TemporalPosition {
            date: self.session_date,
            module_sequence: self.module_sequence,
            session_sequence: self.session_sequence,
        }
    }

    /// A copy of this event relocated to `position`.
    #[must_use]
    pub fn with_position(&self, position: TemporalPosition) -> Self {
        Self {
            session_date: position.date,
            module_sequence: position.module_sequence,
            session_sequence: position.session_sequence,
            ..self.clone()
        }
    }
}
