use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::errors::CbResult;
use crate::model::{ActivityKind, CompletionRecord, SavedQuery};
use crate::ops::store::{CompletionLog, QueryStore};

/// In-memory implementation of the store traits
///
/// Queries keep first-insertion order; a save under an existing name
/// replaces the entry in place.
#[derive(Debug, Default)]
pub struct MemoryStore {
    queries: Mutex<Vec<SavedQuery>>,
    completions: Mutex<HashSet<CompletionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn queries(&self) -> MutexGuard<'_, Vec<SavedQuery>> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn completions(&self) -> MutexGuard<'_, HashSet<CompletionRecord>> {
        self.completions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl QueryStore for MemoryStore {
    fn save_query(&self, query: &SavedQuery) -> CbResult<()> {
        let mut queries = self.queries();
        match queries.iter_mut().find(|q| q.name == query.name) {
            Some(existing) => *existing = query.clone(),
            None => queries.push(query.clone()),
        }
        Ok(())
    }

    fn get_query(&self, name: &str) -> CbResult<Option<SavedQuery>> {
        Ok(self.queries().iter().find(|q| q.name == name).cloned())
    }

    fn list_queries(&self) -> CbResult<Vec<SavedQuery>> {
        Ok(self.queries().clone())
    }
}

impl CompletionLog for MemoryStore {
    fn completed_dates(&self, user_id: &str, kind: ActivityKind) -> CbResult<BTreeSet<NaiveDate>> {
        Ok(self
            .completions()
            .iter()
            .filter(|r| r.user_id == user_id && r.kind == kind)
            .map(|r| r.date)
            .collect())
    }

    fn record_completion(&self, record: &CompletionRecord) -> CbResult<()> {
        self.completions().insert(record.clone());
        Ok(())
    }
}
