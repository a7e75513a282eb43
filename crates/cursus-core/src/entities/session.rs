use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::TemporalPosition;
use crate::enums::SessionStatus;

/// Scheduling metadata for one teaching session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: String,
    pub code: String,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub module_id: String,
    pub module_sequence: i64,
    pub session_sequence: i64,
    pub status: SessionStatus,
}

impl SessionSummary {
    #[must_use]
    pub const fn position(&self) -> TemporalPosition {
        TemporalPosition {
            date: self.date,
            module_sequence: self.module_sequence,
            session_sequence: self.session_sequence,
        }
    }

    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self.status, SessionStatus::Canceled)
    }
}
