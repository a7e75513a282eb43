use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CoverageLevel;

/// A proposal to move one `(skill, level)` pairing off a canceled session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Relocation {
    pub skill_id: String,
    pub level: CoverageLevel,
    pub from_session_id: String,
    pub to_session_id: String,
}
