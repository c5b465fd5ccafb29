//! Logging pipeline: producers → channel → single worker → sink.

pub mod channel;
pub mod sink;
pub mod worker;

pub use channel::{AuditLog, CollectingLog, LogChannel};
pub use sink::{FileSink, LogSink, MemorySink, StdoutSink, format_line};
pub use worker::{WorkerReport, WorkerState};
