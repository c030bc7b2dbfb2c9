//! The command modules loaded at start-up, in help-listing order

use crate::commands::{missed, query};
use crate::dispatcher::PluginInit;

pub const PLUGINS: &[(&str, PluginInit)] = &[("missed", missed::init), ("query", query::init)];
