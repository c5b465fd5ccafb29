//! Environment overrides: process env first, then `.env` in the config directory.

use std::path::{Path, PathBuf};

use crate::types::{Opts, SinkKind};
use crate::utils::config::PackagePaths;

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Look up `key` in the process env, then in `dir/.env` (read without touching the process env).
pub fn lookup_env(dir: &Path, key: &str) -> Option<String> {
    if let Some(v) = std::env::var(key).ok().as_deref().and_then(non_empty) {
        return Some(v);
    }
    let env_path = dir.join(".env");
    if !env_path.is_file() {
        return None;
    }
    let iter = dotenvy::from_path_iter(&env_path)
        .map_err(|e| log::warn!("{}: {}", env_path.display(), e))
        .ok()?;
    iter.filter_map(|item| item.ok())
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| non_empty(&v))
}

/// `TREEMIRROR_LOG_FILE` replaces the audit log destination.
pub fn apply_env_to_opts(dir: &Path, opts: &mut Opts) {
    if let Some(p) = lookup_env(dir, PackagePaths::get().env_log_file()) {
        opts.sink = SinkKind::File(PathBuf::from(p));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_from_dotenv_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "TREEMIRROR_TEST_ONLY_KEY=audit/out.log\nOTHER=1\n",
        )
        .unwrap();
        assert_eq!(
            lookup_env(dir.path(), "TREEMIRROR_TEST_ONLY_KEY"),
            Some("audit/out.log".to_string())
        );
        assert_eq!(lookup_env(dir.path(), "TREEMIRROR_TEST_MISSING_KEY"), None);
    }

    #[test]
    fn test_lookup_without_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(lookup_env(dir.path(), "TREEMIRROR_TEST_MISSING_KEY"), None);
    }
}
