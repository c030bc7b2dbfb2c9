//! Transport-agnostic request handling
//!
//! Each transport (terminal, chat platform) implements [`RequestSurface`]
//! for one incoming message. The dispatcher parses the message text and
//! hands command handlers a [`Request`], which carries the parsed arguments
//! and routes every reply back through the originating surface.

use crossbot_core_types::RequestId;

use crate::errors::CbResult;
use crate::registry::ParsedArgs;

/// Capabilities a transport offers for one incoming message
pub trait RequestSurface: Send + Sync {
    /// Command text with any transport prefix (mention, `cb`) already stripped
    fn text(&self) -> &str;

    /// Identity of the user who sent the message
    fn caller_id(&self) -> &str;

    /// Reply where everyone in the conversation can see it
    fn reply(&self, text: &str) -> CbResult<()>;

    /// Reply visible only to the caller
    fn direct_reply(&self, text: &str) -> CbResult<()>;

    /// Attach a reaction symbol to the incoming message
    fn react(&self, symbol: &str) -> CbResult<()>;

    /// Share a named file with the conversation
    fn upload(&self, name: &str, content: &[u8]) -> CbResult<()>;

    /// Human-readable name for a user id; the raw id when unknown
    fn resolve_display_name(&self, id: &str) -> String {
        id.to_string()
    }
}

/// One parsed message, owned by the dispatcher for the duration of the call
pub struct Request<'a> {
    pub request_id: RequestId,
    pub raw_text: String,
    pub caller_id: String,
    pub args: ParsedArgs,
    surface: &'a dyn RequestSurface,
}

impl<'a> Request<'a> {
    pub fn new(request_id: RequestId, args: ParsedArgs, surface: &'a dyn RequestSurface) -> Self {
        Self {
            request_id,
            raw_text: surface.text().to_string(),
            caller_id: surface.caller_id().to_string(),
            args,
            surface,
        }
    }

    pub fn reply(&self, text: &str) -> CbResult<()> {
        self.surface.reply(text)
    }

    pub fn direct_reply(&self, text: &str) -> CbResult<()> {
        self.surface.direct_reply(text)
    }

    pub fn react(&self, symbol: &str) -> CbResult<()> {
        self.surface.react(symbol)
    }

    pub fn upload(&self, name: &str, content: &[u8]) -> CbResult<()> {
        self.surface.upload(name, content)
    }

    pub fn display_name(&self, id: &str) -> String {
        self.surface.resolve_display_name(id)
    }

    /// The originating surface, for helpers that take one directly
    pub fn surface(&self) -> &'a dyn RequestSurface {
        self.surface
    }
}
