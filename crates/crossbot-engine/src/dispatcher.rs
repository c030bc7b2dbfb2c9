//! Dispatcher
//!
//! Holds the command registry and the bot context. `handle` is the single
//! entry point for every transport: parse, resolve, call the handler.
//! Parse errors go back to the caller as a direct reply and never reach a
//! handler. Handler errors and panics are logged and answered with a fixed
//! reply.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crossbot_core::errors::{CbError, CbErrorKind, CbResult, CrossbotError, Result};
use crossbot_core::registry::CommandRegistry;
use crossbot_core::request::{Request, RequestSurface};
use crossbot_core::{log_op_end, log_op_error, log_op_start};
use crossbot_core_types::RequestId;

use crate::context::BotContext;

/// Reply sent when a handler fails
pub const HANDLER_FAILURE_MESSAGE: &str = "Something went wrong";

/// A command handler: called with the dispatcher and one parsed request
pub type Handler = Arc<dyn Fn(&Dispatcher, &Request<'_>) -> CbResult<()> + Send + Sync>;

/// A plugin registration routine
pub type PluginInit = fn(&mut Dispatcher) -> Result<()>;

/// How one call to `handle` ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion
    Handled { command: String },
    /// The text did not parse; the caller got a direct reply
    Rejected,
    /// The handler returned an error or panicked
    Failed { command: String },
}

pub struct Dispatcher {
    registry: CommandRegistry<Handler>,
    context: BotContext,
    failed_plugins: Vec<String>,
}

impl Dispatcher {
    /// A dispatcher with no commands
    pub fn new(context: BotContext) -> Self {
        Self {
            registry: CommandRegistry::new("crossbot", "A crossword companion bot"),
            context,
            failed_plugins: Vec::new(),
        }
    }

    /// A dispatcher with each plugin in `plugins` registered, in order
    ///
    /// A plugin that returns an error or panics is logged and skipped, and
    /// any commands it registered before failing are rolled back. The
    /// remaining plugins still run.
    pub fn with_plugins(context: BotContext, plugins: &[(&str, PluginInit)]) -> Self {
        let mut dispatcher = Self::new(context);
        for (name, init) in plugins {
            dispatcher.load_plugin(name, *init);
        }
        dispatcher
    }

    fn load_plugin(&mut self, name: &str, init: PluginInit) {
        let start = Instant::now();
        log_op_start!("register_plugin", plugin = name);

        let snapshot = self.registry.clone();
        let outcome = match catch_unwind(AssertUnwindSafe(|| init(self))) {
            Ok(result) => result,
            Err(panic) => Err(CrossbotError::Internal {
                message: panic_message(panic.as_ref()),
            }),
        };

        match outcome {
            Ok(()) => {
                log_op_end!(
                    "register_plugin",
                    duration_ms = start.elapsed().as_millis() as u64,
                    plugin = name
                );
            }
            Err(err) => {
                self.registry = snapshot;
                self.failed_plugins.push(name.to_string());
                let err = CrossbotError::PluginRegistration {
                    plugin: name.to_string(),
                    reason: err.to_string(),
                };
                log_op_error!(
                    "register_plugin",
                    err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    plugin = name
                );
            }
        }
    }

    /// Add a subcommand and its handler
    ///
    /// # Errors
    /// * `DuplicateCommand` - the name is already registered
    pub fn register<F>(&mut self, spec: clap::Command, handler: F) -> Result<()>
    where
        F: Fn(&Dispatcher, &Request<'_>) -> CbResult<()> + Send + Sync + 'static,
    {
        self.registry.register(spec, Arc::new(handler))
    }

    pub fn context(&self) -> &BotContext {
        &self.context
    }

    pub fn registry(&self) -> &CommandRegistry<Handler> {
        &self.registry
    }

    /// Plugins skipped at start-up
    pub fn failed_plugins(&self) -> &[String] {
        &self.failed_plugins
    }

    /// Handle one incoming message
    pub fn handle(&self, surface: &dyn RequestSurface) -> DispatchOutcome {
        let request_id = RequestId::new();
        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            caller_id = surface.caller_id()
        );
        let _enter = span.enter();

        let (handler, args) = match self.registry.parse(surface.text()) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(kind = ?e.kind(), "rejected message");
                send_or_log(surface.direct_reply(e.message()));
                return DispatchOutcome::Rejected;
            }
        };

        let command = args.command().to_string();
        let start = Instant::now();
        log_op_start!("dispatch", command = %command);

        let request = Request::new(request_id.clone(), args, surface);
        let result = match catch_unwind(AssertUnwindSafe(|| handler(self, &request))) {
            Ok(result) => result,
            Err(panic) => Err(CbError::new(CbErrorKind::Internal)
                .with_op("handler")
                .with_message(panic_message(panic.as_ref()))),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => {
                log_op_end!("dispatch", duration_ms = duration_ms, command = %command);
                DispatchOutcome::Handled { command }
            }
            Err(err) => {
                let err = err.with_request_id(request_id);
                log_op_error!("dispatch", err, duration_ms = duration_ms, command = %command);
                send_or_log(surface.reply(HANDLER_FAILURE_MESSAGE));
                DispatchOutcome::Failed { command }
            }
        }
    }
}

fn send_or_log(result: CbResult<()>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "could not deliver reply");
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
