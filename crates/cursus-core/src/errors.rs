//! Cross-cutting error types for Cursus.
//!
//! The engine itself never fails: ordering breaches and hygiene findings are
//! reported as [`ValidationIssue`](crate::issues::ValidationIssue) values.
//! `CoreError` exists for the boundary layer, which must resolve ids and
//! reject structurally invalid requests before calling into the engine.
//! Storage and configuration errors live in their own crates and converge
//! in `cursus-cli`.

use thiserror::Error;

/// Errors raised when a caller hands the boundary an unresolvable request.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// The request is structurally invalid (e.g. a relocation onto a canceled session).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Shorthand for a missing session.
    #[must_use]
    pub fn session_not_found(id: &str) -> Self {
        Self::NotFound {
            entity_type: "session".to_string(),
            id: id.to_string(),
        }
    }
}
