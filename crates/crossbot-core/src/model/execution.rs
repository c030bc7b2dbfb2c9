use serde::{Deserialize, Serialize};

/// A single value in a result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Blobs are never shipped back; only their size.
    Blob(usize),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Real(r) => write!(f, "{}", r),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Blob(len) => write!(f, "<blob {} bytes>", len),
        }
    }
}

/// Ordered rows returned by a query, with column names
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Rows the worker dropped because of the row cap
    #[serde(default)]
    pub truncated: usize,
}

/// A positional parameter bound into a query template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryParam {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl QueryParam {
    /// Bind chat text as a number when it looks like one, text otherwise
    pub fn infer(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            QueryParam::Integer(i)
        } else if let Ok(r) = raw.parse::<f64>() {
            if r.is_finite() {
                QueryParam::Real(r)
            } else {
                QueryParam::Text(raw.to_string())
            }
        } else {
            QueryParam::Text(raw.to_string())
        }
    }
}

/// Why an execution produced no rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Argument count did not match the template; no worker was used
    PlaceholderMismatch { expected: usize, supplied: usize },
    /// The store rejected or failed to evaluate the query
    QueryError(String),
    /// The worker died or spoke garbage mid-call
    WorkerCrashed,
    /// No worker could be started
    WorkerUnavailable,
}

/// Outcome of running a query in the sandbox
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Rows(RowSet),
    Timeout,
    Failure(FailureReason),
}

impl ExecutionResult {
    pub fn is_rows(&self) -> bool {
        matches!(self, ExecutionResult::Rows(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecutionResult::Timeout)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionResult::Failure(_))
    }
}
