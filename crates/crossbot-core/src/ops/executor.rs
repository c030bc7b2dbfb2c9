use std::time::Duration;

use crate::model::{ExecutionResult, QueryParam};

/// Runs untrusted query templates under a wall-clock budget
///
/// Implementations must return within roughly `budget` regardless of what
/// the query does, and must check the parameter count before using any
/// execution resource.
pub trait QueryExecutor: Send + Sync {
    fn execute(&self, template: &str, params: &[QueryParam], budget: Duration) -> ExecutionResult;

    /// Budget applied when the caller has no reason to pick another
    fn default_budget(&self) -> Duration;

    /// Rows a formatter should show before summarizing
    fn max_rows(&self) -> usize {
        50
    }
}
