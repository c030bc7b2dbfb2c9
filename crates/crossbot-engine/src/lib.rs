//! Crossbot Engine - command dispatch
//!
//! Owns the command tree, runs plugin registration at start-up, and turns
//! each incoming message into one handler call. Transports construct a
//! `Dispatcher` once and call `handle` from as many threads as they like.

pub mod commands;
pub mod context;
pub mod dispatcher;
pub mod plugins;

pub use context::BotContext;
pub use dispatcher::{DispatchOutcome, Dispatcher, Handler, PluginInit, HANDLER_FAILURE_MESSAGE};
pub use plugins::PLUGINS;
