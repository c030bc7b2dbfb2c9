//! Worker side of the sandbox
//!
//! Runs in its own process. Opens the database read-only with a hard heap
//! cap, announces readiness, then answers one request line at a time until
//! stdin closes. Every query error is reported as a response line; the
//! worker only exits on I/O failure or end of input.

#![allow(clippy::result_large_err)]

use std::io::{self, BufRead, Write};
use std::path::Path;

use crossbot_core::errors::CbResult;
use crossbot_core::model::{CellValue, QueryParam, RowSet};
use crossbot_store::db;
use rusqlite::types::{Value, ValueRef};
use rusqlite::Connection;

use crate::protocol::{read_line, write_line, WorkerRequest, WorkerResponse};

/// Serve requests on stdin/stdout against the database at `db_path`
///
/// # Errors
/// * `Persistence` - the database could not be opened or configured
/// * `Io` - stdin/stdout failed
pub fn serve(db_path: &Path, heap_limit_bytes: u64, max_rows: usize) -> CbResult<()> {
    let conn = db::open_read_only(db_path)?;
    db::limit_heap(&conn, heap_limit_bytes)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    serve_io(&conn, stdin.lock(), stdout.lock(), max_rows)
}

/// Request loop over arbitrary streams
pub fn serve_io<R: BufRead, W: Write>(
    conn: &Connection,
    mut reader: R,
    mut writer: W,
    max_rows: usize,
) -> CbResult<()> {
    write_line(
        &mut writer,
        &WorkerResponse::Ready {
            pid: std::process::id(),
        },
    )?;

    loop {
        let response = match read_line::<_, WorkerRequest>(&mut reader) {
            Ok(Some(request)) => match run_query(conn, &request, max_rows) {
                Ok(rows) => WorkerResponse::Rows { rows },
                Err(message) => WorkerResponse::Error { message },
            },
            Ok(None) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => WorkerResponse::Error {
                message: "malformed request".to_string(),
            },
            Err(e) => return Err(e.into()),
        };
        write_line(&mut writer, &response)?;
    }
}

/// Run one query, returning at most `max_rows` rows plus a count of the rest
///
/// Errors come back as SQLite's own message text.
pub fn run_query(
    conn: &Connection,
    request: &WorkerRequest,
    max_rows: usize,
) -> Result<RowSet, String> {
    let mut stmt = conn.prepare(&request.sql).map_err(|e| e.to_string())?;

    if !stmt.readonly() {
        return Err("only read-only statements may be run".to_string());
    }
    if stmt.parameter_count() != request.params.len() {
        return Err(format!(
            "statement takes {} parameter(s), {} given",
            stmt.parameter_count(),
            request.params.len()
        ));
    }

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();
    let mut set = RowSet {
        columns,
        rows: Vec::new(),
        truncated: 0,
    };

    let params = rusqlite::params_from_iter(request.params.iter().map(to_value));
    let mut rows = stmt.query(params).map_err(|e| e.to_string())?;
    while let Some(row) = rows.next().map_err(|e| e.to_string())? {
        if set.rows.len() >= max_rows {
            set.truncated += 1;
            continue;
        }
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            cells.push(to_cell(row.get_ref(idx).map_err(|e| e.to_string())?));
        }
        set.rows.push(cells);
    }

    Ok(set)
}

fn to_value(param: &QueryParam) -> Value {
    match param {
        QueryParam::Integer(i) => Value::Integer(*i),
        QueryParam::Real(r) => Value::Real(*r),
        QueryParam::Text(s) => Value::Text(s.clone()),
    }
}

fn to_cell(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Integer(i),
        ValueRef::Real(r) => CellValue::Real(r),
        ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => CellValue::Blob(bytes.len()),
    }
}
