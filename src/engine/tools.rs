//! Path, metadata and filesystem helpers shared by the copy engine.

use std::error::Error as StdError;
use std::fs::{self, DirBuilder, File, Metadata, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::CopyError;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Same relative position under `dst_root` as `path` has under `src_root`.
pub fn mirror_path(path: &Path, src_root: &Path, dst_root: &Path) -> Option<PathBuf> {
    path_relative_to(path, src_root).map(|rel| {
        if rel.as_os_str().is_empty() {
            dst_root.to_path_buf()
        } else {
            dst_root.join(rel)
        }
    })
}

/// Map a stat failure on a source path to not-found / permission-denied / access-error.
pub fn classify_stat(path: &Path, source: io::Error) -> CopyError {
    let path = path.to_path_buf();
    match source.kind() {
        io::ErrorKind::NotFound => CopyError::NotFound { path, source },
        io::ErrorKind::PermissionDenied => CopyError::PermissionDenied { path, source },
        _ => CopyError::Access { path, source },
    }
}

/// Fresh metadata for a source path (follows links), classified on failure.
pub fn stat_source(path: &Path) -> Result<Metadata, CopyError> {
    fs::metadata(path).map_err(|e| classify_stat(path, e))
}

/// Permission bits of `meta` (no file type bits).
#[cfg(unix)]
pub fn source_mode(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
pub fn source_mode(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() { 0o555 } else { 0o777 }
}

/// `mkdir -p`, then give the leaf exactly `mode` regardless of umask, whether it was just
/// created or already existed. Missing ancestors get `mode` reduced by the umask.
pub fn create_dir_with_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
        builder.mode(mode);
        builder.create(path)?;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }
    #[cfg(not(unix))]
    {
        let _ = mode;
        builder.create(path)
    }
}

/// Open `path` for writing, creating it with `mode`. Without `truncate`, bytes past the end
/// of what gets written survive from the previous content.
pub fn open_dest(path: &Path, mode: u32, truncate: bool) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(truncate);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    opts.open(path)
}

/// Apply `mode` to an open file, regardless of umask.
#[cfg(unix)]
pub fn apply_mode(file: &File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub fn apply_mode(_file: &File, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// True when `dst` is the same filesystem object as `src` (hard link, symlink, or the same
/// path spelled differently).
#[cfg(unix)]
pub fn is_same_file(
    src: &Metadata,
    dst: &Metadata,
    _src_path: &Path,
    _dst_path: &Path,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    src.dev() == dst.dev() && src.ino() == dst.ino()
}

#[cfg(not(unix))]
pub fn is_same_file(
    _src: &Metadata,
    _dst: &Metadata,
    src_path: &Path,
    dst_path: &Path,
) -> bool {
    match (src_path.canonicalize(), dst_path.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `outer: inner: root cause`, the same shape anyhow prints with `{:#}`.
pub fn display_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(cause) = cur {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        cur = cause.source();
    }
    out
}

/// True when `path` resolves to `target` (both canonicalized). Used to keep the walk out of a
/// destination nested inside the source.
pub fn resolves_to(path: &Path, target: &Path) -> bool {
    path.canonicalize().map(|p| p == target).unwrap_or(false)
}
