//! Engine module: tree-copy processor, path helpers and the CLI entry point

pub mod arg_parser;
pub mod cli;
pub mod processor;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::{Cli, usage_line};
pub use cli::{handle_run, resolve_opts};
pub use processor::Processor;
pub use tools::{classify_stat, display_chain, mirror_path, path_relative_to, stat_source};
