use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ProgressionStage;

/// A GAIE assessment in the term, positioned for progression checks.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GaieEntry {
    pub assessment_id: String,
    pub progression_stage: ProgressionStage,
    /// Due date, used as a tiebreak when sequences are equal.
    pub date: Option<DateTime<Utc>>,
    pub sequence: i64,
}
