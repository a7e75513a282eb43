//! General CLI defaults.

use serde::{Deserialize, Serialize};

/// Output formats the CLI can render.
pub const OUTPUT_FORMATS: [&str; 3] = ["json", "table", "raw"];

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Term used when `--term` and `--snapshot` are both omitted.
    #[serde(default)]
    pub default_term: Option<String>,

    /// One of [`OUTPUT_FORMATS`].
    #[serde(default = "default_format")]
    pub default_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_term: None,
            default_format: default_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert!(config.default_term.is_none());
        assert_eq!(config.default_format, "json");
    }
}
