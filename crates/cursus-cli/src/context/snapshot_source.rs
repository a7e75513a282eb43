//! Where a command reads its term from.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cursus_core::entities::TermBundle;

use crate::cli::GlobalFlags;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotSource {
    /// A `TermBundle` JSON file.
    File(PathBuf),
    /// A term in the store.
    Term(String),
}

impl SnapshotSource {
    /// `--snapshot` wins, then `--term` / `general.default_term`.
    pub fn from_flags(flags: &GlobalFlags) -> anyhow::Result<Self> {
        if let Some(path) = &flags.snapshot {
            return Ok(Self::File(path.clone()));
        }
        if let Some(term) = &flags.term {
            return Ok(Self::Term(term.clone()));
        }
        anyhow::bail!(
            "no term selected: pass --snapshot <file> or --term <id>, or set general.default_term"
        )
    }
}

/// Parse a snapshot file.
pub fn read_bundle_file(path: &Path) -> anyhow::Result<TermBundle> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
    let bundle: TermBundle = serde_json::from_str(&raw)
        .with_context(|| format!("invalid snapshot file {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        sessions = bundle.snapshot.sessions.len(),
        coverages = bundle.snapshot.coverages.len(),
        gaie = bundle.gaie.len(),
        "read snapshot file"
    );
    Ok(bundle)
}
