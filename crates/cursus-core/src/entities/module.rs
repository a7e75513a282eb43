use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A module of the term. Sessions reference it by `module_id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ModuleSummary {
    pub id: String,
    pub code: String,
    pub title: String,
    pub sequence: i64,
}
