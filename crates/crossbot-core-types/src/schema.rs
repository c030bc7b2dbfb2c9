//! Canonical schema constants for structured logging
//!
//! Field names as they appear on emitted events. Tracing macros need field
//! names as identifiers, so emitters spell them out; these constants are for
//! code that reads events back.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Recorded on the per-request span
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_CALLER_ID: &str = "caller_id";

pub const FIELD_COMMAND: &str = "command";
pub const FIELD_PLUGIN: &str = "plugin";

pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
