//! The log worker: single consumer that drains the channel in arrival order into the sink.

use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, JoinHandle};

use crate::types::LogMessage;
use crate::utils::config::WORKER_THREAD_NAME;

use super::sink::LogSink;

/// Lifecycle of the worker. Only moves forward: `Running` → `Draining` → `Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    /// Consuming messages.
    Running,
    /// Channel closed, remaining backlog being flushed.
    Draining,
    /// Terminal.
    Stopped,
}

impl WorkerState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            WorkerState::Running => 0,
            WorkerState::Draining => 1,
            WorkerState::Stopped => 2,
        }
    }

    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => WorkerState::Running,
            1 => WorkerState::Draining,
            _ => WorkerState::Stopped,
        }
    }
}

/// What the worker did over its lifetime. `delivered + failed` equals the number of messages
/// enqueued before shutdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub delivered: usize,
    pub failed: usize,
}

impl WorkerReport {
    pub fn total(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Spawn the named worker thread. It owns `sink` and exits once every sender is dropped and
/// the backlog is drained.
pub(crate) fn spawn_log_worker<S>(
    msg_rx: Receiver<LogMessage>,
    sink: S,
    state: Arc<AtomicU8>,
) -> std::io::Result<JoinHandle<WorkerReport>>
where
    S: LogSink + 'static,
{
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || run_worker_loop(msg_rx, sink, &state))
}

/// Forward each message to `sink` in arrival order. A failed write is reported on the
/// diagnostic stream and counted; the loop keeps going.
pub(crate) fn run_worker_loop<S>(
    msg_rx: Receiver<LogMessage>,
    mut sink: S,
    state: &AtomicU8,
) -> WorkerReport
where
    S: LogSink,
{
    let mut report = WorkerReport::default();
    while let Ok(msg) = msg_rx.recv() {
        match sink.write(msg.severity(), msg.text()) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                report.failed += 1;
                log::error!(
                    "failed to write log: {} ({:#})",
                    msg.text(),
                    anyhow::Error::new(e)
                );
            }
        }
    }
    state.store(WorkerState::Stopped.as_u8(), Ordering::Release);
    log::debug!(
        "log worker stopped: {} delivered, {} failed",
        report.delivered,
        report.failed
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sink::MemorySink;
    use crate::types::Severity;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_state_round_trip() {
        for s in [
            WorkerState::Running,
            WorkerState::Draining,
            WorkerState::Stopped,
        ] {
            assert_eq!(WorkerState::from_u8(s.as_u8()), s);
        }
    }

    #[test]
    fn test_loop_drains_backlog_after_close() {
        let (tx, rx) = unbounded();
        for i in 0..5 {
            tx.send(LogMessage::new(Severity::Info, format!("m{i}")))
                .unwrap();
        }
        drop(tx);

        let sink = MemorySink::new();
        let state = AtomicU8::new(WorkerState::Draining.as_u8());
        let report = run_worker_loop(rx, sink.clone(), &state);

        assert_eq!(report, WorkerReport { delivered: 5, failed: 0 });
        assert_eq!(WorkerState::from_u8(state.load(Ordering::Acquire)), WorkerState::Stopped);
        let texts: Vec<String> = sink.messages().iter().map(|m| m.text().to_string()).collect();
        assert_eq!(texts, ["m0", "m1", "m2", "m3", "m4"]);
    }
}
