//! Copy and sink error types.

use std::io;
use std::path::{Path, PathBuf};

use crate::types::FailureKind;

/// Failure of a tree or file copy. Leaf variants carry the raw cause as `source`;
/// `File` and `Directory` wrap an inner failure so the full chain stays inspectable.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("source {path:?} does not exist")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source {path:?} is not accessible")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to access source {path:?}")]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source {path:?} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("failed to create directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open source file {path:?}")]
    OpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create destination file {path:?}")]
    CreateDest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {from:?} to {to:?}")]
    Stream {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("destination {path:?} is the source itself")]
    SameFile { path: PathBuf },

    #[error("failed to set permissions on {path:?}")]
    SetMode {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to access path {path:?}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to copy file {path:?}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<CopyError>,
    },

    #[error("failed to copy directory {path:?}")]
    Directory {
        path: PathBuf,
        #[source]
        source: Box<CopyError>,
    },
}

impl CopyError {
    /// Classification of the innermost failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            CopyError::NotFound { .. } => FailureKind::NotFound,
            CopyError::PermissionDenied { .. } => FailureKind::PermissionDenied,
            CopyError::Access { .. } | CopyError::OpenSource { .. } => FailureKind::Access,
            CopyError::CreateDest { source, .. } | CopyError::SetMode { source, .. } => {
                match source.kind() {
                    io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
                    _ => FailureKind::Access,
                }
            }
            CopyError::NotADirectory { .. } => FailureKind::NotADirectory,
            CopyError::SameFile { .. } => FailureKind::SameFile,
            CopyError::CreateDir { .. } => FailureKind::DirectoryCreation,
            CopyError::Stream { .. } => FailureKind::Io,
            CopyError::Walk { source, .. } => match source.io_error().map(io::Error::kind) {
                Some(io::ErrorKind::NotFound) => FailureKind::NotFound,
                Some(io::ErrorKind::PermissionDenied) => FailureKind::PermissionDenied,
                _ => FailureKind::Access,
            },
            CopyError::File { source, .. } | CopyError::Directory { source, .. } => source.kind(),
        }
    }

    /// Path of the innermost failure.
    pub fn path(&self) -> &Path {
        match self {
            CopyError::NotFound { path, .. }
            | CopyError::PermissionDenied { path, .. }
            | CopyError::Access { path, .. }
            | CopyError::NotADirectory { path }
            | CopyError::SameFile { path }
            | CopyError::SetMode { path, .. }
            | CopyError::CreateDir { path, .. }
            | CopyError::OpenSource { path, .. }
            | CopyError::CreateDest { path, .. }
            | CopyError::Walk { path, .. } => path,
            CopyError::Stream { from, .. } => from,
            CopyError::File { source, .. } | CopyError::Directory { source, .. } => source.path(),
        }
    }

    pub(crate) fn in_file(self, path: &Path) -> Self {
        CopyError::File {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_directory(self, path: &Path) -> Self {
        CopyError::Directory {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }
}

/// A log sink could not persist a message. Reported by the worker, never propagated to the copy.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to open log destination {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log line")]
    Write(#[source] io::Error),

    #[error("{0}")]
    Rejected(String),
}
