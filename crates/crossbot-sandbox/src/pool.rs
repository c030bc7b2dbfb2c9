//! Bounded pool of query worker processes
//!
//! Workers are spawned lazily up to `capacity`. A caller checks a worker out,
//! uses it for one call, then either checks it back in or evicts it. Evicted
//! workers are killed off the caller's thread and their slot is freed, so the
//! next check-out spawns a replacement.

#![allow(clippy::result_large_err)]

use std::ffi::OsString;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use crossbot_core::errors::{CbError, CbErrorKind, CbResult};

use crate::protocol::{read_line, write_line, WorkerRequest, WorkerResponse};

/// How to launch a worker process
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn spawn(&self) -> std::io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
    }
}

/// What came back from one call
#[derive(Debug)]
pub enum CallOutcome {
    Response(WorkerResponse),
    /// The deadline passed before a response arrived
    TimedOut,
    /// The pipe closed or carried garbage
    Broken,
}

/// One live worker process
///
/// Dropping a `Worker` kills and reaps the process.
pub struct Worker {
    child: Child,
    stdin: ChildStdin,
    responses: Receiver<WorkerResponse>,
    pid: u32,
}

impl Worker {
    fn start(command: &WorkerCommand, startup_timeout: Duration) -> CbResult<Self> {
        let mut child = command.spawn().map_err(|e| {
            CbError::new(CbErrorKind::WorkerFailure)
                .with_op("spawn_worker")
                .with_message(e.to_string())
        })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CbError::new(CbErrorKind::WorkerFailure)
                    .with_op("spawn_worker")
                    .with_message("worker pipes unavailable"));
            }
        };

        // The reader thread owns stdout and ends when the pipe closes, which
        // drops the sender and disconnects the channel.
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            while let Ok(Some(response)) = read_line::<_, WorkerResponse>(&mut reader) {
                if tx.send(response).is_err() {
                    break;
                }
            }
        });

        let mut worker = Self {
            pid: child.id(),
            child,
            stdin,
            responses: rx,
        };

        match worker.responses.recv_timeout(startup_timeout) {
            Ok(WorkerResponse::Ready { .. }) => {
                tracing::debug!(worker_pid = worker.pid, "worker ready");
                Ok(worker)
            }
            Ok(other) => Err(CbError::new(CbErrorKind::WorkerFailure)
                .with_op("spawn_worker")
                .with_message(format!("unexpected first line from worker: {:?}", other))),
            Err(RecvTimeoutError::Timeout) => Err(CbError::new(CbErrorKind::Timeout)
                .with_op("spawn_worker")
                .with_message("worker did not report ready in time")),
            Err(RecvTimeoutError::Disconnected) => {
                let status = worker.child.try_wait().ok().flatten();
                Err(CbError::new(CbErrorKind::WorkerFailure)
                    .with_op("spawn_worker")
                    .with_message(format!("worker exited during start-up ({:?})", status)))
            }
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Send one request and wait at most `budget` for its response
    pub fn call(&mut self, request: &WorkerRequest, budget: Duration) -> CallOutcome {
        if write_line(&mut self.stdin, request).is_err() {
            return CallOutcome::Broken;
        }
        match self.responses.recv_timeout(budget) {
            Ok(response) => CallOutcome::Response(response),
            Err(RecvTimeoutError::Timeout) => CallOutcome::TimedOut,
            Err(RecvTimeoutError::Disconnected) => CallOutcome::Broken,
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

struct PoolState {
    idle: Vec<Worker>,
    /// Workers alive, idle or checked out
    live: usize,
}

/// Bounded set of reusable workers
pub struct WorkerPool {
    command: WorkerCommand,
    capacity: usize,
    startup_timeout: Duration,
    state: Mutex<PoolState>,
    available: Condvar,
}

impl WorkerPool {
    /// Create an empty pool; no process is started until the first check-out
    pub fn new(command: WorkerCommand, capacity: usize, startup_timeout: Duration) -> Self {
        Self {
            command,
            capacity: capacity.max(1),
            startup_timeout,
            state: Mutex::new(PoolState {
                idle: Vec::new(),
                live: 0,
            }),
            available: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Workers currently alive
    pub fn live(&self) -> usize {
        self.lock().live
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Take an idle worker, start a new one if under capacity, or queue
    ///
    /// # Errors
    /// * `Timeout` - no worker freed up within `max_wait`, or a new worker
    ///   did not report ready in time
    /// * `WorkerFailure` - a new worker could not be started
    pub fn checkout(&self, max_wait: Duration) -> CbResult<Worker> {
        let deadline = Instant::now() + max_wait;
        let mut state = self.lock();
        loop {
            if let Some(worker) = state.idle.pop() {
                return Ok(worker);
            }

            if state.live < self.capacity {
                state.live += 1;
                drop(state);
                return Worker::start(&self.command, self.startup_timeout).map_err(|e| {
                    self.release_slot();
                    e
                });
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(CbError::new(CbErrorKind::Timeout)
                    .with_op("checkout_worker")
                    .with_message("no worker became free in time"));
            }
            state = self
                .available
                .wait_timeout(state, remaining)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|e| e.into_inner().0);
        }
    }

    /// Return a healthy worker for reuse
    pub fn checkin(&self, worker: Worker) {
        self.lock().idle.push(worker);
        self.available.notify_one();
    }

    /// Discard a worker that timed out or broke
    ///
    /// The process is signalled before this returns and the slot is freed
    /// at once; reaping happens on a background thread.
    pub fn evict(&self, mut worker: Worker) {
        let pid = worker.pid();
        let _ = worker.child.kill();
        thread::spawn(move || drop(worker));
        tracing::debug!(worker_pid = pid, "worker evicted");
        self.release_slot();
    }

    fn release_slot(&self) {
        let mut state = self.lock();
        state.live = state.live.saturating_sub(1);
        drop(state);
        self.available.notify_one();
    }
}
