//! Term store location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_path() -> String {
    ".cursus/cursus.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path of the local libSQL file. `:memory:` opens a throwaway store.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.path.trim().is_empty()
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// The configured path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` if the path is blank.
    pub fn require_path(&self) -> Result<&Path, ConfigError> {
        if self.is_configured() {
            Ok(Path::new(&self.path))
        } else {
            Err(ConfigError::NotConfigured {
                section: "database".to_string(),
            })
        }
    }

    /// Directory that must exist before the store can be opened.
    #[must_use]
    pub fn parent_dir(&self) -> Option<PathBuf> {
        if self.is_in_memory() {
            return None;
        }
        Path::new(&self.path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_into_project_dir() {
        let config = DatabaseConfig::default();
        assert!(config.is_configured());
        assert_eq!(config.parent_dir(), Some(PathBuf::from(".cursus")));
    }

    #[test]
    fn blank_path_is_not_configured() {
        let config = DatabaseConfig {
            path: "  ".to_string(),
        };
        assert!(!config.is_configured());
        assert!(matches!(
            config.require_path(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn memory_store_has_no_parent() {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
        };
        assert!(config.is_in_memory());
        assert_eq!(config.parent_dir(), None);
    }
}
