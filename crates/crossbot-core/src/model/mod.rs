pub mod completion;
pub mod execution;
pub mod saved_query;

pub use completion::{ActivityKind, CompletionRecord};
pub use execution::{CellValue, ExecutionResult, FailureReason, QueryParam, RowSet};
pub use saved_query::SavedQuery;
