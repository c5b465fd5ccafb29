//! treemirror CLI: copy a directory tree and write an audit log of every step.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use treemirror::engine::{Cli, handle_run};

fn main() -> Result<ExitCode> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let code = handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(code)
}
