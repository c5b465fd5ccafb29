//! Log channel: unbounded ordered handoff from any number of producers to the log worker.

use anyhow::{Context, Result};
use crossbeam_channel::{Sender, unbounded};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::types::{LogMessage, Severity};

use super::sink::LogSink;
use super::worker::{WorkerReport, WorkerState, spawn_log_worker};

/// Capability to emit audit log events. Passed by reference to whatever produces events
/// (the copy engine takes one at construction).
pub trait AuditLog: Sync {
    fn log(&self, severity: Severity, text: String);

    fn debug(&self, text: String) {
        self.log(Severity::Debug, text);
    }

    fn info(&self, text: String) {
        self.log(Severity::Info, text);
    }

    fn warn(&self, text: String) {
        self.log(Severity::Warn, text);
    }

    fn err(&self, text: String) {
        self.log(Severity::Error, text);
    }
}

impl<L: AuditLog + ?Sized> AuditLog for &L {
    fn log(&self, severity: Severity, text: String) {
        (**self).log(severity, text);
    }
}

/// Producer side of the logging pipeline plus the handle to its single worker.
///
/// Enqueue never waits on the sink. Share it by reference for several producers (e.g.
/// scoped threads); each producer's messages keep their order. [`shutdown`](Self::shutdown)
/// consumes the channel, so nothing can log after it.
pub struct LogChannel {
    msg_tx: Option<Sender<LogMessage>>,
    worker: Option<JoinHandle<WorkerReport>>,
    state: Arc<AtomicU8>,
}

impl LogChannel {
    /// Start the worker thread that owns `sink`.
    pub fn spawn<S>(sink: S) -> Result<Self>
    where
        S: LogSink + 'static,
    {
        let (msg_tx, msg_rx) = unbounded::<LogMessage>();
        let state = Arc::new(AtomicU8::new(WorkerState::Running.as_u8()));
        let worker = spawn_log_worker(msg_rx, sink, Arc::clone(&state))
            .context("spawn log worker thread")?;
        Ok(Self {
            msg_tx: Some(msg_tx),
            worker: Some(worker),
            state,
        })
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Close the channel and block until the worker has handed every queued message to the sink.
    pub fn shutdown(mut self) -> WorkerReport {
        self.close_and_drain()
    }

    fn close_and_drain(&mut self) -> WorkerReport {
        let Some(worker) = self.worker.take() else {
            return WorkerReport::default();
        };
        let _ = self.state.compare_exchange(
            WorkerState::Running.as_u8(),
            WorkerState::Draining.as_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        // Dropping the only sender closes the channel; the worker exits after the backlog.
        drop(self.msg_tx.take());
        match worker.join() {
            Ok(report) => report,
            Err(_) => {
                log::error!("log worker panicked; queued log messages may be lost");
                self.state
                    .store(WorkerState::Stopped.as_u8(), Ordering::Release);
                WorkerReport::default()
            }
        }
    }
}

impl AuditLog for LogChannel {
    fn log(&self, severity: Severity, text: String) {
        let Some(msg_tx) = &self.msg_tx else {
            return;
        };
        if let Err(e) = msg_tx.send(LogMessage::new(severity, text)) {
            log::error!(
                "log worker is gone, message not queued: {}",
                e.into_inner().text()
            );
        }
    }
}

impl Drop for LogChannel {
    fn drop(&mut self) {
        let _ = self.close_and_drain();
    }
}

/// Synchronous in-memory [`AuditLog`]: no worker, messages are available right away.
#[derive(Debug, Default)]
pub struct CollectingLog {
    messages: Mutex<Vec<LogMessage>>,
}

impl CollectingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.messages
            .lock()
            .map(|m| m.iter().filter(|msg| msg.severity() == severity).count())
            .unwrap_or(0)
    }
}

impl AuditLog for CollectingLog {
    fn log(&self, severity: Severity, text: String) {
        if let Ok(mut m) = self.messages.lock() {
            m.push(LogMessage::new(severity, text));
        }
    }
}
