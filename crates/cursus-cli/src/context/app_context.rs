use anyhow::Context;
use cursus_config::CursusConfig;
use cursus_core::entities::TermBundle;
use cursus_db::CursusDb;

use super::snapshot_source::{SnapshotSource, read_bundle_file};
use crate::cli::GlobalFlags;

/// Shared application resources.
///
/// The term store is opened on first use so snapshot-file commands never
/// touch the database.
pub struct AppContext {
    pub config: CursusConfig,
    db: Option<CursusDb>,
}

impl AppContext {
    #[must_use]
    pub const fn new(config: CursusConfig) -> Self {
        Self { config, db: None }
    }

    /// The term store, opening it (and creating its directory) if needed.
    pub async fn db(&mut self) -> anyhow::Result<&CursusDb> {
        if self.db.is_none() {
            let db = open_store(&self.config).await?;
            self.db = Some(db);
        }
        self.db.as_ref().context("term store is not open")
    }

    /// Read the term selected by the global flags.
    pub async fn load_bundle(&mut self, flags: &GlobalFlags) -> anyhow::Result<TermBundle> {
        match SnapshotSource::from_flags(flags)? {
            SnapshotSource::File(path) => read_bundle_file(&path),
            SnapshotSource::Term(term_id) => self
                .db()
                .await?
                .load_term_bundle(&term_id)
                .await
                .with_context(|| format!("failed to load term {term_id}")),
        }
    }
}

async fn open_store(config: &CursusConfig) -> anyhow::Result<CursusDb> {
    let path = config.database.require_path()?;
    if let Some(dir) = config.database.parent_dir() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let path = path.to_string_lossy();
    CursusDb::open_local(&path)
        .await
        .with_context(|| format!("failed to open term store at {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(path: &str) -> CursusConfig {
        let mut config = CursusConfig::default();
        config.database.path = path.to_string();
        config
    }

    #[tokio::test]
    async fn store_is_opened_lazily_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cursus.db");
        let mut ctx = AppContext::new(config_at(path.to_str().unwrap()));
        assert!(!path.exists());

        let term = ctx.db().await.unwrap().create_term("Fall", None, None).await.unwrap();
        assert!(path.exists());
        let terms = ctx.db().await.unwrap().list_terms().await.unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].id, term.id);
    }

    #[tokio::test]
    async fn blank_database_path_is_rejected() {
        let mut ctx = AppContext::new(config_at("  "));
        assert!(ctx.db().await.is_err());
    }
}
