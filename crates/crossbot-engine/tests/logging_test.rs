// Structured log events emitted by the dispatcher
//
// Kept in its own test binary: the capture subscriber is process-global.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{jan, FakeExecutor, RecordingSurface};
use crossbot_core::errors::{CrossbotError, Result};
use crossbot_core::logging_facility::init_test_capture;
use crossbot_core::{FixedClock, MemoryStore};
use crossbot_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CALLER_ID, FIELD_COMMAND, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_PLUGIN,
};
use crossbot_engine::commands::query;
use crossbot_engine::{BotContext, Dispatcher, PluginInit};

fn context() -> BotContext {
    let store = Arc::new(MemoryStore::new());
    BotContext::new(
        store.clone(),
        store,
        Arc::new(FakeExecutor::new()),
        Arc::new(FixedClock::new(jan(3))),
    )
}

fn refusing_plugin(_dispatcher: &mut Dispatcher) -> Result<()> {
    Err(CrossbotError::Internal {
        message: "not today".to_string(),
    })
}

#[test]
fn test_plugin_failure_and_dispatch_are_logged() {
    let capture = init_test_capture();
    let context = context();
    let plugins: &[(&str, PluginInit)] = &[("refusing", refusing_plugin), ("query", query::init)];

    // WHEN plugins load and one request is handled
    let dispatcher = Dispatcher::with_plugins(context, plugins);
    dispatcher.handle(&RecordingSurface::new("U1", "query"));

    // THEN the failed registration carries its code and plugin name
    let failures: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.is("register_plugin", EVENT_END_ERROR))
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].field(FIELD_ERR_CODE), Some("ERR_REGISTRATION_FAILED"));
    assert_eq!(failures[0].field(FIELD_ERR_KIND), Some("RegistrationFailed"));
    assert_eq!(failures[0].field(FIELD_PLUGIN), Some("refusing"));
    assert_eq!(failures[0].request_id, None);

    // AND the dispatched command logged start and end
    capture.assert_event_exists("dispatch", "start");
    let ends = capture.count_events(|e| {
        e.is("dispatch", EVENT_END)
            && e.field(FIELD_COMMAND) == Some("query")
            && e.field(FIELD_CALLER_ID) == Some("U1")
    });
    assert_eq!(ends, 1);
}

#[test]
fn test_each_request_logs_under_its_own_request_id() {
    // GIVEN a dispatcher with the query command
    let capture = init_test_capture();
    let plugins: &[(&str, PluginInit)] = &[("query", query::init)];
    let dispatcher = Dispatcher::with_plugins(context(), plugins);

    // WHEN one caller sends two messages
    dispatcher.handle(&RecordingSurface::new("U-corr", "query"));
    dispatcher.handle(&RecordingSurface::new("U-corr", "query nosuch"));

    // THEN each dispatch has a distinct request id
    let ids = capture.request_ids(|e| {
        e.is("dispatch", EVENT_START) && e.field(FIELD_CALLER_ID) == Some("U-corr")
    });
    assert_eq!(ids.len(), 2);

    // AND start and end of each dispatch carry the same id and caller
    for id in &ids {
        let events = capture.for_request(id);
        assert!(events.iter().any(|e| e.is("dispatch", EVENT_START)));
        assert!(events.iter().any(|e| e.is("dispatch", EVENT_END)));
        assert!(events.iter().all(|e| e.field(FIELD_CALLER_ID) == Some("U-corr")));
    }
}
