#![allow(dead_code)]

use std::path::PathBuf;

use crossbot_core::model::SavedQuery;
use crossbot_core::ops::QueryStore;
use crossbot_sandbox::{ExecutorConfig, SandboxedExecutor, WorkerCommand};
use crossbot_store::SqliteStore;
use tempfile::TempDir;

pub const RUNAWAY_QUERY: &str =
    "WITH RECURSIVE r(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM r) SELECT count(*) FROM r";

pub struct Fixture {
    pub dir: TempDir,
    pub db: PathBuf,
    pub store: SqliteStore,
}

/// A migrated database with one saved query in it
pub fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("crossbot.db");
    let store = SqliteStore::open(&db).unwrap();
    store
        .save_query(&SavedQuery::new(
            "seed",
            "SELECT 1",
            "U1",
            chrono::Utc::now(),
        ))
        .unwrap();
    Fixture { dir, db, store }
}

pub fn config(pool_size: usize, budget_ms: u64) -> ExecutorConfig {
    ExecutorConfig {
        pool_size,
        budget_ms,
        ..ExecutorConfig::default()
    }
}

pub fn executor(fixture: &Fixture, config: ExecutorConfig) -> SandboxedExecutor {
    let command = SandboxedExecutor::worker_command(
        WorkerCommand::new(env!("CARGO_BIN_EXE_crossbot-query-worker")),
        &fixture.db,
        &config,
    );
    SandboxedExecutor::new(command, config)
}
