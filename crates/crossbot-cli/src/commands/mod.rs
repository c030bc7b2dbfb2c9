pub mod exec;
pub mod query_worker;
pub mod record;
pub mod shell;
