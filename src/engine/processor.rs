//! Tree-copy engine: mirrors a source directory into a destination, one audit event per step.

use log::debug;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::CopyError;
use crate::pipeline::AuditLog;
use crate::types::{CopyOpts, CopyStats};
use crate::utils::config::COPY_BUFFER_SIZE;

use super::tools::{
    apply_mode, create_dir_with_mode, display_chain, is_same_file, mirror_path, open_dest,
    resolves_to, source_mode, stat_source,
};

/// Copies trees and files, logging through the injected [`AuditLog`].
///
/// Every filesystem operation yields exactly one audit event: an INFO line on success, or an
/// ERROR line where the failure happens. Callers up the chain wrap the error without logging
/// it again.
pub struct Processor<'a, L: AuditLog + ?Sized> {
    log: &'a L,
    opts: CopyOpts,
}

impl<'a, L: AuditLog + ?Sized> Processor<'a, L> {
    pub fn new(log: &'a L, opts: CopyOpts) -> Self {
        Self { log, opts }
    }

    /// Mirror `source_dir` into `dest_dir` (pre-order, sorted by file name). Stops at the first
    /// failure; the destination keeps whatever was copied before it.
    pub fn copy_directory(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
    ) -> Result<CopyStats, CopyError> {
        let meta = stat_source(source_dir).map_err(|e| self.fail(e))?;
        if !meta.is_dir() {
            return Err(self.fail(CopyError::NotADirectory {
                path: source_dir.to_path_buf(),
            }));
        }
        if let Ok(dst_meta) = fs::metadata(dest_dir)
            && is_same_file(&meta, &dst_meta, source_dir, dest_dir)
        {
            return Err(self.fail(CopyError::SameFile {
                path: dest_dir.to_path_buf(),
            }));
        }

        create_dir_with_mode(dest_dir, source_mode(&meta)).map_err(|source| {
            self.fail(CopyError::CreateDir {
                path: dest_dir.to_path_buf(),
                source,
            })
        })?;
        self.log
            .info(format!("Created destination directory {:?}", dest_dir));

        let mut stats = CopyStats {
            dirs_created: 1,
            ..CopyStats::default()
        };
        self.copy_tree(source_dir, dest_dir, &mut stats)
            .map_err(|e| e.in_directory(source_dir))?;
        debug!(
            "copied {:?} -> {:?}: {} dirs, {} files, {} bytes",
            source_dir, dest_dir, stats.dirs_created, stats.files_copied, stats.bytes_copied
        );
        Ok(stats)
    }

    /// Copy bytes and permission bits of `source_file` to `dest_file`. Returns bytes copied.
    /// A partially written destination is left in place on failure.
    pub fn copy_file(&self, source_file: &Path, dest_file: &Path) -> Result<u64, CopyError> {
        let meta = stat_source(source_file).map_err(|e| self.fail(e))?;
        let mode = source_mode(&meta);
        // Opening the source itself for writing would truncate it before a byte is read.
        if let Ok(dst_meta) = fs::metadata(dest_file)
            && is_same_file(&meta, &dst_meta, source_file, dest_file)
        {
            return Err(self.fail(CopyError::SameFile {
                path: dest_file.to_path_buf(),
            }));
        }

        let src = File::open(source_file).map_err(|source| {
            self.fail(CopyError::OpenSource {
                path: source_file.to_path_buf(),
                source,
            })
        })?;
        let mut dst = open_dest(dest_file, mode, self.opts.truncate).map_err(|source| {
            self.fail(CopyError::CreateDest {
                path: dest_file.to_path_buf(),
                source,
            })
        })?;

        let stream_err = |source: io::Error| {
            self.fail(CopyError::Stream {
                from: source_file.to_path_buf(),
                to: dest_file.to_path_buf(),
                source,
            })
        };
        let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, src);
        let bytes = io::copy(&mut reader, &mut dst).map_err(stream_err)?;
        apply_mode(&dst, mode).map_err(|source| {
            self.fail(CopyError::SetMode {
                path: dest_file.to_path_buf(),
                source,
            })
        })?;
        Ok(bytes)
    }

    fn copy_tree(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        stats: &mut CopyStats,
    ) -> Result<(), CopyError> {
        let dest_canonical = dest_dir.canonicalize().ok();
        let walker = WalkDir::new(source_dir)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let nested_dest = e.file_type().is_dir()
                    && dest_canonical
                        .as_deref()
                        .is_some_and(|dst| resolves_to(e.path(), dst));
                if nested_dest {
                    debug!("skipping destination nested in source: {:?}", e.path());
                }
                !nested_dest
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| source_dir.to_path_buf());
                self.fail(CopyError::Walk { path, source: e })
            })?;
            let src_path = entry.path();
            let dest_path = self.dest_for(src_path, source_dir, dest_dir)?;

            if entry.file_type().is_dir() {
                let meta = entry.metadata().map_err(|e| {
                    self.fail(CopyError::Walk {
                        path: src_path.to_path_buf(),
                        source: e,
                    })
                })?;
                create_dir_with_mode(&dest_path, source_mode(&meta)).map_err(|source| {
                    self.fail(CopyError::CreateDir {
                        path: dest_path.clone(),
                        source,
                    })
                })?;
                self.log.info(format!("Created directory {:?}", dest_path));
                stats.dirs_created += 1;
            } else {
                let bytes = self
                    .copy_file(src_path, &dest_path)
                    .map_err(|e| e.in_file(src_path))?;
                self.log
                    .info(format!("Copied file {:?} to {:?}", src_path, dest_path));
                stats.files_copied += 1;
                stats.bytes_copied += bytes;
            }
        }
        Ok(())
    }

    fn dest_for(
        &self,
        src_path: &Path,
        source_dir: &Path,
        dest_dir: &Path,
    ) -> Result<PathBuf, CopyError> {
        mirror_path(src_path, source_dir, dest_dir).ok_or_else(|| {
            self.fail(CopyError::Access {
                path: src_path.to_path_buf(),
                source: io::Error::other("path is outside the source directory"),
            })
        })
    }

    /// Log `err` once at ERROR with its cause chain and hand it back for propagation.
    fn fail(&self, err: CopyError) -> CopyError {
        self.log.err(display_chain(&err));
        err
    }
}
