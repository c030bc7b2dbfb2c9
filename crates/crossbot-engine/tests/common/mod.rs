#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use crossbot_core::errors::CbResult;
use crossbot_core::model::{CellValue, ExecutionResult, QueryParam, RowSet};
use crossbot_core::ops::QueryExecutor;
use crossbot_core::request::RequestSurface;
use crossbot_core::{FixedClock, MemoryStore};
use crossbot_engine::{BotContext, Dispatcher, PLUGINS};

/// Something the bot sent back through a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Reply(String),
    Direct(String),
    React(String),
    Upload(String, usize),
}

/// In-memory surface that records every reply
pub struct RecordingSurface {
    text: String,
    caller: String,
    sent: Mutex<Vec<Sent>>,
}

impl RecordingSurface {
    pub fn new(caller: &str, text: &str) -> Self {
        Self {
            text: text.to_string(),
            caller: caller.to_string(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// The single public reply, panicking if there was anything else
    pub fn only_reply(&self) -> String {
        match self.sent().as_slice() {
            [Sent::Reply(text)] => text.clone(),
            other => panic!("expected exactly one reply, got {:?}", other),
        }
    }

    pub fn only_direct(&self) -> String {
        match self.sent().as_slice() {
            [Sent::Direct(text)] => text.clone(),
            other => panic!("expected exactly one direct reply, got {:?}", other),
        }
    }

    fn push(&self, sent: Sent) -> CbResult<()> {
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

impl RequestSurface for RecordingSurface {
    fn text(&self) -> &str {
        &self.text
    }

    fn caller_id(&self) -> &str {
        &self.caller
    }

    fn reply(&self, text: &str) -> CbResult<()> {
        self.push(Sent::Reply(text.to_string()))
    }

    fn direct_reply(&self, text: &str) -> CbResult<()> {
        self.push(Sent::Direct(text.to_string()))
    }

    fn react(&self, symbol: &str) -> CbResult<()> {
        self.push(Sent::React(symbol.to_string()))
    }

    fn upload(&self, name: &str, content: &[u8]) -> CbResult<()> {
        self.push(Sent::Upload(name.to_string(), content.len()))
    }

    fn resolve_display_name(&self, id: &str) -> String {
        match id {
            "U1" => "alice".to_string(),
            "U2" => "bob".to_string(),
            other => other.to_string(),
        }
    }
}

/// Executor that records calls and returns a canned result
pub struct FakeExecutor {
    calls: Mutex<Vec<(String, Vec<QueryParam>)>>,
    result: Mutex<ExecutionResult>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            result: Mutex::new(ExecutionResult::Rows(RowSet {
                columns: vec!["result".to_string()],
                rows: vec![vec![CellValue::Integer(1)]],
                truncated: 0,
            })),
        }
    }

    pub fn returning(&self, result: ExecutionResult) {
        *self.result.lock().unwrap() = result;
    }

    pub fn calls(&self) -> Vec<(String, Vec<QueryParam>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl QueryExecutor for FakeExecutor {
    fn execute(&self, template: &str, params: &[QueryParam], _budget: Duration) -> ExecutionResult {
        self.calls
            .lock()
            .unwrap()
            .push((template.to_string(), params.to_vec()));
        self.result.lock().unwrap().clone()
    }

    fn default_budget(&self) -> Duration {
        Duration::from_secs(1)
    }
}

pub fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, day).unwrap()
}

/// A dispatcher with the standard plugins over in-memory collaborators
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub executor: Arc<FakeExecutor>,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new(today: NaiveDate) -> Self {
        let store = Arc::new(MemoryStore::new());
        let executor = Arc::new(FakeExecutor::new());
        let context = BotContext::new(
            store.clone(),
            store.clone(),
            executor.clone(),
            Arc::new(FixedClock::new(today)),
        );
        let dispatcher = Dispatcher::with_plugins(context, PLUGINS);
        Self {
            store,
            executor,
            dispatcher,
        }
    }

    /// Send `text` as `caller` and return what came back
    pub fn send(&self, caller: &str, text: &str) -> RecordingSurface {
        let surface = RecordingSurface::new(caller, text);
        self.dispatcher.handle(&surface);
        surface
    }
}
