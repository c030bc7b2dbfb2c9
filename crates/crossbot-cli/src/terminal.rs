//! `RequestSurface` for a terminal
//!
//! Public replies are printed as-is. Direct replies are addressed to the
//! caller, reactions print as `:symbol:`, and uploads print a one-line
//! summary. Each reply is written under the writer's lock in one piece, so
//! concurrent requests never interleave within a reply.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crossbot_core::errors::{CbError, CbErrorKind, CbResult};
use crossbot_core::request::RequestSurface;

pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

pub struct TerminalSurface {
    text: String,
    caller: String,
    out: SharedWriter,
}

impl TerminalSurface {
    pub fn new(caller: impl Into<String>, text: impl Into<String>, out: SharedWriter) -> Self {
        Self {
            text: text.into(),
            caller: caller.into(),
            out,
        }
    }

    fn emit(&self, block: &str) -> CbResult<()> {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{}", block)
            .and_then(|()| out.flush())
            .map_err(|e| {
                CbError::new(CbErrorKind::Transport)
                    .with_op("terminal_write")
                    .with_message("could not write reply")
                    .with_source(e.into())
            })
    }
}

impl RequestSurface for TerminalSurface {
    fn text(&self) -> &str {
        &self.text
    }

    fn caller_id(&self) -> &str {
        &self.caller
    }

    fn reply(&self, text: &str) -> CbResult<()> {
        self.emit(text)
    }

    fn direct_reply(&self, text: &str) -> CbResult<()> {
        self.emit(&format!("@{} - {}", self.caller, text))
    }

    fn react(&self, symbol: &str) -> CbResult<()> {
        self.emit(&format!(":{}:", symbol))
    }

    fn upload(&self, name: &str, content: &[u8]) -> CbResult<()> {
        self.emit(&format!("[file {} ({} bytes)]", name, content.len()))
    }
}
