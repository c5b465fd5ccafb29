//! Load `.treemirror.toml` from a directory (CLI only). Lib callers pass options directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::{Opts, SinkKind};
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TreemirrorToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    log_file: Option<String>,
    stdout_log: Option<bool>,
    verbose: Option<bool>,
    truncate: Option<bool>,
    exit_zero: Option<bool>,
}

/// Load the config file from `dir`. `Ok(None)` when there is no file; `Err` when it exists but
/// cannot be read or parsed.
pub(crate) fn load_treemirror_toml(dir: &Path) -> Result<Option<TreemirrorToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let file = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(file))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $idx.$field {
            $opts.$field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI.
pub(crate) fn apply_file_to_opts(file: &TreemirrorToml, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(ref p) = s.log_file {
        opts.sink = SinkKind::File(PathBuf::from(p));
    }
    if s.stdout_log == Some(true) {
        opts.sink = SinkKind::Stdout;
    }
    apply_file_opt!(s, opts, verbose);
    apply_file_opt!(s, opts, truncate);
    apply_file_opt!(s, opts, exit_zero);
}
