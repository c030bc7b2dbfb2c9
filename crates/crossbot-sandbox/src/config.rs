use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_DEFAULT_POOL: usize = 4;

/// Tuning for the sandboxed executor
///
/// Every field has a default, so a partial `[executor]` table in the bot's
/// TOML config is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Maximum number of live worker processes
    pub pool_size: usize,
    /// Wall-clock budget for one query
    pub budget_ms: u64,
    /// SQLite hard heap limit inside each worker
    pub heap_limit_bytes: u64,
    /// Rows a worker returns before counting the rest
    pub max_rows: usize,
    /// How long a new worker has to report ready
    pub startup_timeout_ms: u64,
    /// How long a call waits for a free worker when the pool is full
    pub queue_timeout_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            pool_size: parallelism.min(MAX_DEFAULT_POOL),
            budget_ms: 1000,
            heap_limit_bytes: 64 * 1024 * 1024,
            max_rows: 50,
            startup_timeout_ms: 5000,
            queue_timeout_ms: 10_000,
        }
    }
}

impl ExecutorConfig {
    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    pub fn queue_timeout(&self) -> Duration {
        Duration::from_millis(self.queue_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExecutorConfig::default();
        assert!(config.pool_size >= 1 && config.pool_size <= MAX_DEFAULT_POOL);
        assert_eq!(config.budget(), Duration::from_secs(1));
        assert_eq!(config.max_rows, 50);
    }

    #[test]
    fn test_partial_table_fills_defaults() {
        let config: ExecutorConfig = serde_json::from_str(r#"{"budget_ms": 250}"#).unwrap();
        assert_eq!(config.budget_ms, 250);
        assert_eq!(config.max_rows, ExecutorConfig::default().max_rows);
    }
}
