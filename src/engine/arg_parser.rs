use clap::Parser;
use std::path::PathBuf;

use crate::utils::config::PackagePaths;

/// Mirror a directory tree and write an audit log of every step.
#[derive(Clone, Debug, Default, Parser)]
#[command(name = "treemirror")]
#[command(about = "Copy a directory tree (contents and permission bits) and log every action.")]
pub struct Cli {
    /// Directory to copy from.
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Directory to copy into. Created (with parents) if missing.
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// Audit log file (appended). Default: `treemirror.log` in the current directory.
    #[arg(long, short = 'o')]
    pub log_file: Option<PathBuf>,

    /// Write the audit log to stdout instead of a file.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub stdout_log: Option<bool>,

    /// Verbose diagnostics on stderr.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Truncate existing destination files to the copied length. `--truncate false` keeps stale trailing bytes.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub truncate: Option<bool>,

    /// Exit with status 0 even when the copy fails.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub exit_zero: Option<bool>,
}

/// Printed when SOURCE or DEST is missing.
pub fn usage_line() -> String {
    format!(
        "Usage: {} <source directory> <destination directory>",
        PackagePaths::get().pkg_name()
    )
}
