use crate::model::{CellValue, ExecutionResult, FailureReason, RowSet};
use crate::rules::arity_summary;

/// Reply sent when a query exceeds its wall-clock budget
pub const TIMEOUT_MESSAGE: &str = "you cant dos me even with saved queries, incident reported";

const NO_ROWS_MESSAGE: &str = "(no rows)";
const CRASHED_MESSAGE: &str = "The query worker crashed while running that query.";
const UNAVAILABLE_MESSAGE: &str = "No query worker is available right now, try again later.";
const MAX_ERROR_LEN: usize = 200;

/// Column whose values are user ids and get shown as display names
const USER_ID_COLUMN: &str = "userid";

/// Render an execution result as reply text
///
/// Rows become one line each with ` | ` between cells, under a header line
/// when there is more than one column. A lone value is returned bare.
/// Timeouts and failures become fixed messages; worker diagnostics are
/// never included.
///
/// # Arguments
/// * `result` - Outcome from the executor
/// * `max_rows` - Rows shown before the rest are summarized
/// * `display_name` - Resolves values of a `userid` column
pub fn render_execution(
    result: &ExecutionResult,
    max_rows: usize,
    display_name: &dyn Fn(&str) -> String,
) -> String {
    match result {
        ExecutionResult::Rows(rows) => render_rows(rows, max_rows, display_name),
        ExecutionResult::Timeout => TIMEOUT_MESSAGE.to_string(),
        ExecutionResult::Failure(reason) => render_failure(reason),
    }
}

fn render_failure(reason: &FailureReason) -> String {
    match reason {
        FailureReason::PlaceholderMismatch { expected, supplied } => {
            format!("That query {}.", arity_summary(*expected, *supplied))
        }
        FailureReason::QueryError(message) => {
            format!("Query failed: {}", first_line_truncated(message))
        }
        FailureReason::WorkerCrashed => CRASHED_MESSAGE.to_string(),
        FailureReason::WorkerUnavailable => UNAVAILABLE_MESSAGE.to_string(),
    }
}

fn first_line_truncated(message: &str) -> String {
    let line = message.lines().next().unwrap_or_default();
    if line.chars().count() <= MAX_ERROR_LEN {
        line.to_string()
    } else {
        let mut cut: String = line.chars().take(MAX_ERROR_LEN).collect();
        cut.push('…');
        cut
    }
}

fn render_rows(set: &RowSet, max_rows: usize, display_name: &dyn Fn(&str) -> String) -> String {
    if set.rows.is_empty() {
        return NO_ROWS_MESSAGE.to_string();
    }

    let user_columns: Vec<bool> = set
        .columns
        .iter()
        .map(|c| c.eq_ignore_ascii_case(USER_ID_COLUMN))
        .collect();

    let render_cell = |idx: usize, cell: &CellValue| -> String {
        match cell {
            CellValue::Text(id) if user_columns.get(idx).copied().unwrap_or(false) => {
                display_name(id)
            }
            other => other.to_string(),
        }
    };

    if set.columns.len() == 1 && set.rows.len() == 1 && set.truncated == 0 {
        if let Some(cell) = set.rows[0].first() {
            return render_cell(0, cell);
        }
    }

    let mut lines = Vec::new();
    if set.columns.len() > 1 {
        lines.push(set.columns.join(" | "));
    }
    for row in set.rows.iter().take(max_rows) {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(idx, cell)| render_cell(idx, cell))
            .collect();
        lines.push(cells.join(" | "));
    }

    let hidden = set.rows.len().saturating_sub(max_rows) + set.truncated;
    if hidden > 0 {
        let plural = if hidden == 1 { "" } else { "s" };
        lines.push(format!("… {} more row{}", hidden, plural));
    }

    lines.join("\n")
}
