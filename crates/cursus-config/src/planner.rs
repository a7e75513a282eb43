//! Relocation planner tuning.

use serde::{Deserialize, Serialize};

const fn default_max_suggestions() -> usize {
    20
}

const fn default_prefer_same_module() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannerConfig {
    /// Upper bound on suggestions returned for one cancellation.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Rank sessions in the canceled session's module ahead of others.
    #[serde(default = "default_prefer_same_module")]
    pub prefer_same_module: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            prefer_same_module: default_prefer_same_module(),
        }
    }
}
