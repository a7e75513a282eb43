//! # cursus-config
//!
//! Layered configuration for Cursus, built on figment.
//!
//! Sources, highest priority first:
//! 1. `CURSUS_*` environment variables, `__` separating sections
//! 2. Project-level `.cursus/config.toml`
//! 3. User-level `~/.config/cursus/config.toml`
//! 4. Built-in defaults
//!
//! `CURSUS_DATABASE__PATH` maps to `database.path`,
//! `CURSUS_PLANNER__MAX_SUGGESTIONS` to `planner.max_suggestions`.
//!
//! ```no_run
//! use cursus_config::CursusConfig;
//!
//! let config = CursusConfig::load_with_dotenv().expect("config");
//! if config.database.is_configured() {
//!     println!("store: {}", config.database.path);
//! }
//! ```

mod database;
mod error;
mod general;
mod planner;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::{GeneralConfig, OUTPUT_FORMATS};
pub use planner::PlannerConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".cursus/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CursusConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
}

impl CursusConfig {
    /// Load from TOML files and the environment, then validate.
    ///
    /// `.env` is not read here; see [`Self::load_with_dotenv`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse and
    /// `ConfigError::InvalidValue` if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load `.env` from the working directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is the common case.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load with an explicit project config file instead of
    /// [`LOCAL_CONFIG_PATH`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_from(local_path: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment_with_local(local_path))
    }

    /// The default provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with_local(Path::new(LOCAL_CONFIG_PATH))
    }

    fn figment_with_local(local_path: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("CURSUS_").split("__"))
    }

    /// Extract and validate.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !OUTPUT_FORMATS.contains(&self.general.default_format.as_str()) {
            return Err(ConfigError::invalid(
                "general.default_format",
                format!(
                    "expected one of {}, got '{}'",
                    OUTPUT_FORMATS.join(", "),
                    self.general.default_format
                ),
            ));
        }
        if self.planner.max_suggestions == 0 {
            return Err(ConfigError::invalid(
                "planner.max_suggestions",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cursus").join("config.toml"))
    }
}
