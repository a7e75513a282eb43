use thiserror::Error;

/// Failures while building or checking a [`CursusConfig`](crate::CursusConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider could not be read or a value failed to deserialize.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section the caller depends on has no usable value.
    #[error("Configuration section '{section}' is not configured")]
    NotConfigured { section: String },

    /// A value parsed but is outside what Cursus accepts.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
