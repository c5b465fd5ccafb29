//! Log sinks: the terminal writers behind the log worker. One fallible operation, swappable.

use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::SinkError;
use crate::types::{LogMessage, Severity};

/// Persists a single leveled message. Called from the worker thread only.
pub trait LogSink: Send {
    fn write(&mut self, severity: Severity, message: &str) -> Result<(), SinkError>;
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn write(&mut self, severity: Severity, message: &str) -> Result<(), SinkError> {
        (**self).write(severity, message)
    }
}

/// `[<Label>] [<YYYY-mm-dd HH:MM:SS>] <message>`
pub fn format_line(severity: Severity, message: &str, at: &DateTime<Local>) -> String {
    format!(
        "[{}] [{}] {}",
        severity.label(),
        at.format("%Y-%m-%d %H:%M:%S"),
        message
    )
}

/// Appends one line per message to a file. The file is opened in append mode for every write,
/// so each line is on disk once `write` returns.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write(&mut self, severity: Severity, message: &str) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?;
        let line = format_line(severity, message, &Local::now());
        writeln!(file, "{}", line).map_err(SinkError::Write)
    }
}

/// Writes lines to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&mut self, severity: Severity, message: &str) -> Result<(), SinkError> {
        let line = format_line(severity, message, &Local::now());
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", line).map_err(SinkError::Write)
    }
}

/// Keeps every message in memory. Clones share the same buffer, so keep one clone to read
/// what the worker delivered.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<LogMessage>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of delivered messages in delivery order.
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

    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn write(&mut self, severity: Severity, message: &str) -> Result<(), SinkError> {
        self.messages
            .lock()
            .map_err(|_| SinkError::Rejected("memory sink poisoned".to_string()))?
            .push(LogMessage::new(severity, message));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_line_layout() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            format_line(Severity::Warn, "disk almost full", &at),
            "[Warning] [2024-03-09 07:05:01] disk almost full"
        );
    }

    #[test]
    fn test_file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let mut sink = FileSink::new(&path);
        sink.write(Severity::Info, "first").unwrap();
        sink.write(Severity::Error, "second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[Info] ["));
        assert!(lines[0].ends_with("] first"));
        assert!(lines[1].starts_with("[Error] ["));
        assert!(lines[1].ends_with("] second"));
    }

    #[test]
    fn test_file_sink_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("nope").join("audit.log"));
        let err = sink.write(Severity::Info, "lost").unwrap_err();
        assert!(matches!(err, SinkError::Open { .. }));
    }

    #[test]
    fn test_memory_sink_shared_between_clones() {
        let reader = MemorySink::new();
        let mut writer = reader.clone();
        writer.write(Severity::Debug, "a").unwrap();
        writer.write(Severity::Info, "b").unwrap();
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.count(Severity::Info), 1);
        assert_eq!(reader.messages()[0].text(), "a");
    }
}
