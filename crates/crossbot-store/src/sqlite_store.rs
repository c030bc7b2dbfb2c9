//! File-backed implementation of the core store traits

#![allow(clippy::result_large_err)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use crossbot_core::errors::CbResult;
use crossbot_core::model::{ActivityKind, CompletionRecord, SavedQuery};
use crossbot_core::ops::{CompletionLog, QueryStore};
use rusqlite::Connection;

use crate::db;
use crate::errors::{io_error, Result};
use crate::migrations::apply_migrations;
use crate::repo::SqliteRepo;

/// Store backed by one SQLite file
///
/// Holds only the path. Each operation opens its own connection and drops
/// it before returning, so no transaction ever spans a request and the store
/// is trivially shareable across request threads.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and bring its schema
    /// up to date
    ///
    /// # Errors
    /// * `Io` - the parent directory could not be created
    /// * `Persistence` / `ConstraintViolation` - migrations failed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error("create_db_dir", e))?;
        }

        let mut conn = db::open(&path)?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;

        tracing::debug!(path = %path.display(), "store ready");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = db::open(&self.path)?;
        db::configure(&conn)?;
        Ok(conn)
    }
}

impl QueryStore for SqliteStore {
    fn save_query(&self, query: &SavedQuery) -> CbResult<()> {
        let conn = self.connect()?;
        SqliteRepo::persist_query(&conn, query)
            .map_err(|e| e.with_entity_id(query.name.clone()))
    }

    fn get_query(&self, name: &str) -> CbResult<Option<SavedQuery>> {
        let conn = self.connect()?;
        SqliteRepo::get_query(&conn, name)
    }

    fn list_queries(&self) -> CbResult<Vec<SavedQuery>> {
        let conn = self.connect()?;
        SqliteRepo::list_queries(&conn)
    }
}

impl CompletionLog for SqliteStore {
    fn completed_dates(&self, user_id: &str, kind: ActivityKind) -> CbResult<BTreeSet<NaiveDate>> {
        let conn = self.connect()?;
        SqliteRepo::completed_dates(&conn, user_id, kind)
    }

    fn record_completion(&self, record: &CompletionRecord) -> CbResult<()> {
        let conn = self.connect()?;
        SqliteRepo::persist_completion(&conn, record)
    }
}
