//! Public and internal types for the treemirror API and logging pipeline.

use std::fmt;
use std::path::PathBuf;

/// Urgency of an audit log message. Ordered by increasing urgency; nothing is filtered by level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Label written by the sinks (`[Warning] ...`).
    pub fn label(self) -> &'static str {
        match self {
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Warn => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One audit log event. Built by a producer, moved through the channel, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogMessage {
    severity: Severity,
    text: String,
}

impl LogMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Classification of a copy failure. See [`CopyError::kind`](crate::CopyError::kind).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    PermissionDenied,
    /// Stat/open failures that are neither `NotFound` nor `PermissionDenied`.
    Access,
    NotADirectory,
    /// Read or write failure while streaming file bytes.
    Io,
    DirectoryCreation,
    /// Destination resolves to the source itself.
    SameFile,
}

/// Lib-only options for [`Processor`](crate::engine::Processor).
#[derive(Clone, Debug)]
pub struct CopyOpts {
    /// Truncate an existing destination file to the new length. When false, a longer
    /// pre-existing destination keeps its stale trailing bytes.
    pub truncate: bool,
}

impl Default for CopyOpts {
    fn default() -> Self {
        Self { truncate: true }
    }
}

/// Counters for a successful [`copy_directory`](crate::engine::Processor::copy_directory).
/// `dirs_created` includes the destination root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub dirs_created: usize,
    pub files_copied: usize,
    pub bytes_copied: u64,
}

/// Where the audit log goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkKind {
    /// Append to a file.
    File(PathBuf),
    Stdout,
}

/// Full options (CLI). Use [`CopyOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub sink: SinkKind,
    /// Diagnostic output at DEBUG for this crate.
    pub verbose: bool,
    pub truncate: bool,
    /// Exit with status 0 even when the copy fails.
    pub exit_zero: bool,
}

impl From<&Opts> for CopyOpts {
    fn from(o: &Opts) -> Self {
        CopyOpts {
            truncate: o.truncate,
        }
    }
}
