//! `QueryExecutor` backed by the worker pool

use std::path::Path;
use std::time::{Duration, Instant};

use crossbot_core::errors::CrossbotError;
use crossbot_core::model::{ExecutionResult, FailureReason, QueryParam};
use crossbot_core::ops::QueryExecutor;
use crossbot_core::rules::check_arity;
use crossbot_core::{log_op_end, log_op_error, log_op_start};

use crate::config::ExecutorConfig;
use crate::pool::{CallOutcome, WorkerCommand, WorkerPool};
use crate::protocol::{WorkerRequest, WorkerResponse};

/// Runs saved queries in pooled worker processes
pub struct SandboxedExecutor {
    pool: WorkerPool,
    config: ExecutorConfig,
}

impl SandboxedExecutor {
    /// Build an executor whose workers are launched with `command`
    pub fn new(command: WorkerCommand, config: ExecutorConfig) -> Self {
        let pool = WorkerPool::new(command, config.pool_size, config.startup_timeout());
        Self { pool, config }
    }

    /// Append the worker flags for `db` and `config` to `base`
    ///
    /// `base` is either the standalone `crossbot-query-worker` binary or a
    /// program plus the subcommand that serves as a worker.
    pub fn worker_command(base: WorkerCommand, db: &Path, config: &ExecutorConfig) -> WorkerCommand {
        base.arg("--db")
            .arg(db.as_os_str())
            .arg("--heap-limit")
            .arg(config.heap_limit_bytes.to_string())
            .arg("--max-rows")
            .arg(config.max_rows.to_string())
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

impl QueryExecutor for SandboxedExecutor {
    fn execute(&self, template: &str, params: &[QueryParam], budget: Duration) -> ExecutionResult {
        if let Err(CrossbotError::PlaceholderMismatch { expected, supplied }) =
            check_arity(template, params.len())
        {
            return ExecutionResult::Failure(FailureReason::PlaceholderMismatch {
                expected,
                supplied,
            });
        }

        let start = Instant::now();
        log_op_start!("execute_query", budget_ms = budget.as_millis() as u64);

        let mut worker = match self.pool.checkout(self.config.queue_timeout()) {
            Ok(worker) => worker,
            Err(e) => {
                log_op_error!(
                    "execute_query",
                    e,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                return ExecutionResult::Failure(FailureReason::WorkerUnavailable);
            }
        };

        let request = WorkerRequest {
            sql: template.to_string(),
            params: params.to_vec(),
        };

        let pid = worker.pid();
        let result = match worker.call(&request, budget) {
            CallOutcome::Response(WorkerResponse::Rows { rows }) => {
                self.pool.checkin(worker);
                ExecutionResult::Rows(rows)
            }
            CallOutcome::Response(WorkerResponse::Error { message }) => {
                self.pool.checkin(worker);
                ExecutionResult::Failure(FailureReason::QueryError(message))
            }
            CallOutcome::Response(WorkerResponse::Ready { .. }) | CallOutcome::Broken => {
                self.pool.evict(worker);
                ExecutionResult::Failure(FailureReason::WorkerCrashed)
            }
            CallOutcome::TimedOut => {
                tracing::warn!(
                    worker_pid = pid,
                    budget_ms = budget.as_millis() as u64,
                    "query exceeded budget, terminating worker"
                );
                self.pool.evict(worker);
                ExecutionResult::Timeout
            }
        };

        let row_count = match &result {
            ExecutionResult::Rows(rows) => rows.rows.len() + rows.truncated,
            _ => 0,
        };
        log_op_end!(
            "execute_query",
            duration_ms = start.elapsed().as_millis() as u64,
            worker_pid = pid,
            row_count = row_count,
            timed_out = result.is_timeout()
        );
        result
    }

    fn default_budget(&self) -> Duration {
        self.config.budget()
    }

    fn max_rows(&self) -> usize {
        self.config.max_rows
    }
}
