//! Error handling for crossbot-store
//!
//! Wraps crossbot-core CbError with store-specific helpers

use crossbot_core::errors::{CbError, CbErrorKind};

/// Result type alias using CbError
pub type Result<T> = std::result::Result<T, CbError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> CbError {
    CbError::new(CbErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> CbError {
    CbError::new(CbErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> CbError {
    CbError::new(CbErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> CbError {
    CbError::new(CbErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// A stored value that can't be mapped back into the domain model
pub fn corrupt_row(table: &str, reason: &str) -> CbError {
    CbError::new(CbErrorKind::Persistence)
        .with_op("decode_row")
        .with_entity_id(table)
        .with_message(reason.to_string())
}
