use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A competency. Skills are the denominator for coverage health.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SkillSummary {
    pub id: String,
    pub code: String,
    pub description: String,
    pub category: String,
}
