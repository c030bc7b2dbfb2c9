//! Crossbot Core - transport-agnostic command kernel
//!
//! This crate provides the pieces every transport and command module shares:
//! - Structured error facility (`CbError`, `CbErrorKind`, `CrossbotError`)
//! - Structured logging facility and canonical `log_op_*` macros
//! - The `RequestSurface` capability trait and the per-message `Request`
//! - `CommandRegistry`, the subcommand tree that turns text into a handler
//! - Saved-query model, template rules, and the result formatter
//! - The missed-day algorithm
//! - Store and executor traits implemented by `crossbot-store` and `crossbot-sandbox`

pub mod clock;
pub mod errors;
pub mod logging_facility;
pub mod missed;
pub mod model;
pub mod ops;
pub mod registry;
pub mod render;
pub mod request;
pub mod rules;

// Used by the logging macros so callers don't need a direct dependency.
#[doc(hidden)]
pub use crossbot_core_types as core_types;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{CbError, CbErrorKind, CbResult, CrossbotError, Result};
pub use model::{ActivityKind, CompletionRecord, ExecutionResult, FailureReason, SavedQuery};
pub use ops::{CompletionLog, MemoryStore, QueryExecutor, QueryStore};
pub use registry::{CommandRegistry, ParseError, ParseErrorKind, ParsedArgs};
pub use request::{Request, RequestSurface};
