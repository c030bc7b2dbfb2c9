//! Crossbot Sandbox - out-of-process execution of saved queries
//!
//! User-authored SQL never runs in the bot's own process. Each query is
//! sent to a worker process over a JSON-lines pipe; the caller waits on a
//! channel with a deadline and, when the deadline passes, kills the worker
//! and replaces it.
//!
//! - `protocol` - request/response lines exchanged with a worker
//! - `worker` - the worker side: read-only connection, heap cap, serve loop
//! - `pool` - bounded set of reusable worker processes
//! - `executor` - `SandboxedExecutor`, the `QueryExecutor` implementation

pub mod config;
pub mod executor;
pub mod pool;
pub mod protocol;
pub mod worker;

pub use config::ExecutorConfig;
pub use executor::SandboxedExecutor;
pub use pool::{WorkerCommand, WorkerPool};
