//! Repository layer mapping the domain model onto SQLite rows

pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
