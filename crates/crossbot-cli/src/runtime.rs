//! Wiring the dispatcher to real collaborators

use std::sync::Arc;

use chrono::NaiveDate;
use crossbot_core::{Clock, FixedClock, SystemClock};
use crossbot_engine::{BotContext, Dispatcher, PLUGINS};
use crossbot_sandbox::{SandboxedExecutor, WorkerCommand};
use crossbot_store::SqliteStore;

use crate::config::BotConfig;

/// Open the store and build a dispatcher with every plugin loaded
///
/// Query workers are this same executable re-run with the hidden
/// `query-worker` subcommand.
pub fn build_dispatcher(
    config: &BotConfig,
    today: Option<NaiveDate>,
) -> Result<Dispatcher, Box<dyn std::error::Error>> {
    let store = Arc::new(SqliteStore::open(&config.db_path)?);

    let exe = std::env::current_exe()?;
    let worker = SandboxedExecutor::worker_command(
        WorkerCommand::new(exe).arg("query-worker"),
        &config.db_path,
        &config.executor,
    );
    let executor = Arc::new(SandboxedExecutor::new(worker, config.executor.clone()));

    let clock: Arc<dyn Clock> = match today {
        Some(date) => Arc::new(FixedClock::new(date)),
        None => Arc::new(SystemClock),
    };

    let context = BotContext::new(store.clone(), store, executor, clock);
    let dispatcher = Dispatcher::with_plugins(context, PLUGINS);
    for plugin in dispatcher.failed_plugins() {
        tracing::warn!(plugin = %plugin, "plugin not loaded");
    }
    Ok(dispatcher)
}
