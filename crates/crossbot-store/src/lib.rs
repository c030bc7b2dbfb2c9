//! Crossbot Store - SQLite persistence for saved queries and completions
//!
//! Provides:
//! - Connection helpers (read-write for the bot, read-only for query workers)
//! - Embedded, checksummed schema migrations
//! - `SqliteRepo`, stateless statements over a borrowed connection
//! - `SqliteStore`, the `QueryStore`/`CompletionLog` implementation

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod sqlite_store;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteRepo;
pub use sqlite_store::SqliteStore;
