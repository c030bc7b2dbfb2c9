//! Hidden subcommand that turns this executable into a query worker

use std::path::Path;

use clap::Args;
use crossbot_sandbox::{worker, ExecutorConfig};

/// The database comes from the global `--db` flag.
#[derive(Debug, Args)]
pub struct QueryWorkerArgs {
    /// SQLite hard heap limit in bytes
    #[arg(long)]
    pub heap_limit: Option<u64>,

    /// Rows returned per query before the rest are only counted
    #[arg(long)]
    pub max_rows: Option<usize>,
}

pub fn execute(args: QueryWorkerArgs, db: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let db = db.ok_or("query-worker needs --db")?;
    let defaults = ExecutorConfig::default();
    worker::serve(
        db,
        args.heap_limit.unwrap_or(defaults.heap_limit_bytes),
        args.max_rows.unwrap_or(defaults.max_rows),
    )?;
    Ok(())
}
