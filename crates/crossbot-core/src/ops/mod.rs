pub mod executor;
pub mod memory_store;
pub mod store;

pub use executor::QueryExecutor;
pub use memory_store::MemoryStore;
pub use store::{CompletionLog, QueryStore};
