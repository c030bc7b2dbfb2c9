//! Storage seams used by command modules
//!
//! `crossbot-store` implements these over SQLite; [`MemoryStore`] implements
//! them in memory for tests and ephemeral runs.
//!
//! [`MemoryStore`]: crate::ops::MemoryStore

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::errors::CbResult;
use crate::model::{ActivityKind, CompletionRecord, SavedQuery};

/// Persistent mapping from query name to saved template
///
/// Every operation is short-lived; none holds a transaction across calls.
pub trait QueryStore: Send + Sync {
    /// Create or replace the query stored under `query.name`
    ///
    /// Replacement is atomic: readers see either the old or the new entry.
    fn save_query(&self, query: &SavedQuery) -> CbResult<()>;

    /// Look up a query by name
    fn get_query(&self, name: &str) -> CbResult<Option<SavedQuery>>;

    /// All saved queries in store iteration order
    fn list_queries(&self) -> CbResult<Vec<SavedQuery>>;
}

/// Completed-puzzle history, keyed by (user, kind, date)
pub trait CompletionLog: Send + Sync {
    /// Dates on which `user_id` completed a puzzle of `kind`
    fn completed_dates(&self, user_id: &str, kind: ActivityKind) -> CbResult<BTreeSet<NaiveDate>>;

    /// Record a completion; recording the same key twice is a no-op
    fn record_completion(&self, record: &CompletionRecord) -> CbResult<()>;
}
