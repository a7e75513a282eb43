//! ID prefix constants for persisted Cursus rows.
//!
//! IDs have the form `{prefix}-{8 hex chars}`, e.g. `ses-a3f8b2c1`. The
//! engine does not generate or interpret them; the store does.

pub const PREFIX_TERM: &str = "trm";
pub const PREFIX_MODULE: &str = "mod";
pub const PREFIX_SESSION: &str = "ses";
pub const PREFIX_SKILL: &str = "skl";
pub const PREFIX_COVERAGE: &str = "cov";

/// Format an ID from a prefix and random hex suffix.
#[must_use]
pub fn format_id(prefix: &str, suffix: &str) -> String {
    format!("{prefix}-{suffix}")
}
