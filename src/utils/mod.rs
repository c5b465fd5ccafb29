pub mod config;
pub mod env;
pub mod logger;
pub mod treemirror_toml;

pub use config::*;
pub use env::{apply_env_to_opts, lookup_env};
pub use logger::setup_logging;
pub(crate) use treemirror_toml::{apply_file_to_opts, load_treemirror_toml};
