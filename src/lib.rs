//! Treemirror: recursive directory mirroring with an asynchronous audit log

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::{CopyError, SinkError};
pub use types::*;

pub use engine::Processor;
pub use pipeline::{AuditLog, LogChannel, LogSink, WorkerReport};

use log::debug;
use std::path::Path;

/// Result alias used by public treemirror API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: mirror `source` into `dest`, auditing every step into `sink` through a
/// background worker. The audit log is fully drained before this returns, on success and on
/// failure.
///
/// A copy failure comes back as an [`Error`] wrapping [`CopyError`]; use
/// `err.downcast_ref::<CopyError>()` to inspect its [`kind`](CopyError::kind) and path.
///
/// ```ignore
/// let sink = treemirror::pipeline::MemorySink::new();
/// let (stats, report) = treemirror::mirror_dir(src, dst, &CopyOpts::default(), sink.clone())?;
/// assert_eq!(report.total(), sink.len());
/// ```
pub fn mirror_dir<S>(
    source: &Path,
    dest: &Path,
    opts: &CopyOpts,
    sink: S,
) -> Result<(CopyStats, WorkerReport)>
where
    S: LogSink + 'static,
{
    let channel = LogChannel::spawn(sink)?;
    let result = Processor::new(&channel, opts.clone()).copy_directory(source, dest);
    let report = channel.shutdown();
    debug!(
        "audit log drained: {} written, {} failed",
        report.delivered, report.failed
    );
    Ok((result?, report))
}
