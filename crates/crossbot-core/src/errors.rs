use crossbot_core_types::RequestId;
use thiserror::Error;

use crate::rules::arity_summary;

/// Result type alias using CrossbotError
pub type Result<T> = std::result::Result<T, CrossbotError>;

/// Result type alias using the structured CbError facility
pub type CbResult<T> = std::result::Result<T, CbError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that is safe to log, assert on in
/// tests, and (for the user-facing kinds) show to a chat user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CbErrorKind {
    // Input
    InvalidInput,
    NotFound,
    AlreadyExists,

    // Saved queries
    PlaceholderMismatch,
    UnsafeQuery,

    // Start-up
    RegistrationFailed,

    // Integration/IO
    Io,
    Persistence,
    ConstraintViolation,
    Transport,
    Timeout,
    WorkerFailure,

    // Internal
    Internal,
}

impl CbErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            CbErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            CbErrorKind::NotFound => "ERR_NOT_FOUND",
            CbErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            CbErrorKind::PlaceholderMismatch => "ERR_PLACEHOLDER_MISMATCH",
            CbErrorKind::UnsafeQuery => "ERR_UNSAFE_QUERY",
            CbErrorKind::RegistrationFailed => "ERR_REGISTRATION_FAILED",
            CbErrorKind::Io => "ERR_IO",
            CbErrorKind::Persistence => "ERR_PERSISTENCE",
            CbErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            CbErrorKind::Transport => "ERR_TRANSPORT",
            CbErrorKind::Timeout => "ERR_TIMEOUT",
            CbErrorKind::WorkerFailure => "ERR_WORKER_FAILURE",
            CbErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus enough context
/// (operation, entity, request) to find the matching log lines.
#[derive(Debug, Clone)]
pub struct CbError {
    kind: CbErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<CbError>>,
}

impl CbError {
    /// Create a new error with the specified kind
    pub fn new(kind: CbErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (query name, plugin name, user id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: CbError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> CbErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&CbError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for CbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for CbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for Crossbot operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrossbotError {
    /// No saved query exists under the requested name
    #[error("No known command `{name}`")]
    QueryNotFound { name: String },

    /// Saved query names must be short identifiers
    #[error("Invalid query name `{name}`: {reason}")]
    InvalidQueryName { name: String, reason: String },

    /// A save was attempted with no query body
    #[error("Cannot save an empty query")]
    EmptyQuery,

    /// The query body contains a keyword that would modify the store
    #[error("Queries may not contain `{keyword}`")]
    UnsafeQuery { keyword: String },

    /// The caller supplied a different number of arguments than the template takes
    #[error("Query {}", arity_message(.expected, .supplied))]
    PlaceholderMismatch { expected: usize, supplied: usize },

    /// Two command modules tried to register the same subcommand
    #[error("Command `{name}` is already registered")]
    DuplicateCommand { name: String },

    /// A plugin's registration routine failed
    #[error("Plugin `{plugin}` failed to register: {reason}")]
    PluginRegistration { plugin: String, reason: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<CrossbotError> for CbError {
    fn from(err: CrossbotError) -> Self {
        match err {
            CrossbotError::QueryNotFound { name } => CbError::new(CbErrorKind::NotFound)
                .with_entity_id(name)
                .with_message("Saved query not found"),

            CrossbotError::InvalidQueryName { name, reason } => {
                CbError::new(CbErrorKind::InvalidInput)
                    .with_entity_id(name)
                    .with_message(format!("Invalid query name: {}", reason))
            }

            CrossbotError::EmptyQuery => {
                CbError::new(CbErrorKind::InvalidInput).with_message("Query body is empty")
            }

            CrossbotError::UnsafeQuery { keyword } => CbError::new(CbErrorKind::UnsafeQuery)
                .with_message(format!("Query contains forbidden keyword {}", keyword)),

            CrossbotError::PlaceholderMismatch { expected, supplied } => {
                CbError::new(CbErrorKind::PlaceholderMismatch).with_message(format!(
                    "Expected {} parameter(s), got {}",
                    expected, supplied
                ))
            }

            CrossbotError::DuplicateCommand { name } => CbError::new(CbErrorKind::AlreadyExists)
                .with_op("register_command")
                .with_entity_id(name)
                .with_message("Command already registered"),

            CrossbotError::PluginRegistration { plugin, reason } => {
                CbError::new(CbErrorKind::RegistrationFailed)
                    .with_op("register_plugin")
                    .with_entity_id(plugin)
                    .with_message(reason)
            }

            CrossbotError::Internal { message } => {
                CbError::new(CbErrorKind::Internal).with_message(message)
            }
        }
    }
}

fn arity_message(expected: &usize, supplied: &usize) -> String {
    arity_summary(*expected, *supplied)
}

/// Conversion from std::io::Error to CbError
impl From<std::io::Error> for CbError {
    fn from(err: std::io::Error) -> Self {
        CbError::new(CbErrorKind::Io).with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_stable() {
        let cases = [
            (CbErrorKind::NotFound, "ERR_NOT_FOUND"),
            (CbErrorKind::PlaceholderMismatch, "ERR_PLACEHOLDER_MISMATCH"),
            (CbErrorKind::UnsafeQuery, "ERR_UNSAFE_QUERY"),
            (CbErrorKind::RegistrationFailed, "ERR_REGISTRATION_FAILED"),
            (CbErrorKind::Timeout, "ERR_TIMEOUT"),
            (CbErrorKind::WorkerFailure, "ERR_WORKER_FAILURE"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_query_not_found_maps_to_not_found() {
        let err: CbError = CrossbotError::QueryNotFound {
            name: "myq".to_string(),
        }
        .into();
        assert_eq!(err.kind(), CbErrorKind::NotFound);
        assert_eq!(err.entity_id(), Some("myq"));
    }

    #[test]
    fn test_query_not_found_user_message() {
        let err = CrossbotError::QueryNotFound {
            name: "myq".to_string(),
        };
        assert_eq!(err.to_string(), "No known command `myq`");
    }

    #[test]
    fn test_placeholder_mismatch_user_message() {
        let err = CrossbotError::PlaceholderMismatch {
            expected: 2,
            supplied: 1,
        };
        assert_eq!(err.to_string(), "Query takes 2 arguments but 1 was given");
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = CbError::new(CbErrorKind::Persistence)
            .with_op("save_query")
            .with_message("disk full")
            .with_entity_id("myq");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_PERSISTENCE]"));
        assert!(rendered.contains("save_query"));
        assert!(rendered.contains("disk full"));
        assert!(rendered.contains("myq"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = CbError::new(CbErrorKind::Io).with_message("broken pipe");
        let outer = CbError::new(CbErrorKind::Transport).with_source(inner);
        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(CbErrorKind::Io)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }
}
