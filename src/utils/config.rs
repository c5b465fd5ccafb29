//! Application configuration constants.
//! Names, buffer sizes and env keys in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    log_filename: String,
    config_filename: String,
    env_log_file: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                log_filename: format!("{pkg}.log"),
                config_filename: format!(".{pkg}.toml"),
                env_log_file: format!("{}_LOG_FILE", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Default audit log file, relative to the working directory.
    pub fn log_filename(&self) -> &str {
        &self.log_filename
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Env var overriding the audit log file (`TREEMIRROR_LOG_FILE`).
    pub fn env_log_file(&self) -> &str {
        &self.env_log_file
    }
}

// ---- Copy ----

/// Read buffer for streaming file contents (bytes). 256 KB.
pub const COPY_BUFFER_SIZE: usize = 256 * 1024;

// ---- Logging pipeline ----

/// Name of the background thread that feeds the log sink.
pub const WORKER_THREAD_NAME: &str = "treemirror-log";
