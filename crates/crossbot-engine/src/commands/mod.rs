//! Command modules
//!
//! Each module exposes an `init` that registers its subcommands with the
//! dispatcher. Modules don't know about each other.

pub mod missed;
pub mod query;
