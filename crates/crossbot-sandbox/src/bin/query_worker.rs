//! Standalone query worker
//!
//! Spawned by `WorkerPool`; speaks the JSON-lines protocol on stdin/stdout.

use std::path::PathBuf;

use clap::Parser;
use crossbot_core::logging_facility::{self, Profile};
use crossbot_sandbox::{worker, ExecutorConfig};

#[derive(Parser)]
#[command(name = "crossbot-query-worker")]
#[command(about = "Sandboxed read-only query worker", long_about = None)]
struct Cli {
    /// Database to open read-only
    #[arg(long)]
    db: PathBuf,

    /// SQLite hard heap limit in bytes
    #[arg(long)]
    heap_limit: Option<u64>,

    /// Rows returned per query before the rest are only counted
    #[arg(long)]
    max_rows: Option<usize>,
}

fn main() {
    logging_facility::init(Profile::Production);

    let cli = Cli::parse();
    let defaults = ExecutorConfig::default();
    let result = worker::serve(
        &cli.db,
        cli.heap_limit.unwrap_or(defaults.heap_limit_bytes),
        cli.max_rows.unwrap_or(defaults.max_rows),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "query worker exiting");
        std::process::exit(1);
    }
}
