use std::sync::Arc;

use crossbot_core::ops::{CompletionLog, QueryExecutor, QueryStore};
use crossbot_core::Clock;

/// Everything a command handler may touch
///
/// Built once by the transport and handed to the dispatcher; handlers reach
/// it through `Dispatcher::context`.
#[derive(Clone)]
pub struct BotContext {
    pub queries: Arc<dyn QueryStore>,
    pub completions: Arc<dyn CompletionLog>,
    pub executor: Arc<dyn QueryExecutor>,
    pub clock: Arc<dyn Clock>,
}

impl BotContext {
    pub fn new(
        queries: Arc<dyn QueryStore>,
        completions: Arc<dyn CompletionLog>,
        executor: Arc<dyn QueryExecutor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            queries,
            completions,
            executor,
            clock,
        }
    }
}
