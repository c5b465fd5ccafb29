//! CLI command handler: resolve options, run the copy, always drain the audit log.

use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;
use std::process::ExitCode;

use crate::engine::arg_parser::{Cli, usage_line};
use crate::engine::processor::Processor;
use crate::pipeline::{FileSink, LogChannel, LogSink, StdoutSink};
use crate::types::{CopyOpts, Opts, SinkKind};
use crate::utils::config::PackagePaths;
use crate::utils::{apply_env_to_opts, apply_file_to_opts, load_treemirror_toml, setup_logging};

/// Overwrite opts field from the CLI when the flag was given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $cli.$field {
            $opts.$field = v;
        }
    };
}

/// Defaults < `.treemirror.toml` in `config_dir` < environment < CLI.
pub fn resolve_opts(
    cli: &Cli,
    source: &Path,
    dest: &Path,
    config_dir: &Path,
) -> (Opts, Option<anyhow::Error>) {
    let mut opts = Opts {
        source: source.to_path_buf(),
        dest: dest.to_path_buf(),
        sink: SinkKind::File(PackagePaths::get().log_filename().into()),
        verbose: false,
        truncate: CopyOpts::default().truncate,
        exit_zero: false,
    };
    let file_err = match load_treemirror_toml(config_dir) {
        Ok(Some(file)) => {
            apply_file_to_opts(&file, &mut opts);
            None
        }
        Ok(None) => None,
        Err(e) => Some(e),
    };
    apply_env_to_opts(config_dir, &mut opts);

    if let Some(ref p) = cli.log_file {
        opts.sink = SinkKind::File(p.clone());
    }
    if cli.stdout_log == Some(true) {
        opts.sink = SinkKind::Stdout;
    }
    apply_cli_opt!(cli, opts, verbose);
    apply_cli_opt!(cli, opts, truncate);
    apply_cli_opt!(cli, opts, exit_zero);
    (opts, file_err)
}

fn sink_for(kind: &SinkKind) -> Box<dyn LogSink> {
    match kind {
        SinkKind::File(path) => Box::new(FileSink::new(path)),
        SinkKind::Stdout => Box::new(StdoutSink),
    }
}

/// Run the copy. Prints usage and succeeds when SOURCE or DEST is missing; prints the full
/// error chain on stdout when the copy fails.
pub fn handle_run(cli: &Cli) -> Result<ExitCode> {
    let (Some(source), Some(dest)) = (cli.source.as_deref(), cli.dest.as_deref()) else {
        println!("{}", usage_line());
        return Ok(ExitCode::SUCCESS);
    };

    let (opts, file_err) = resolve_opts(cli, source, dest, Path::new("."));
    setup_logging(opts.verbose);
    if let Some(e) = file_err {
        warn!("{:#}", e);
    }
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );

    let channel = LogChannel::spawn(sink_for(&opts.sink))?;
    let result =
        Processor::new(&channel, CopyOpts::from(&opts)).copy_directory(&opts.source, &opts.dest);
    let report = channel.shutdown();
    debug!(
        "audit log drained: {} written, {} failed",
        report.delivered, report.failed
    );
    if report.failed > 0 {
        warn!("{} audit log lines could not be written", report.failed);
    }

    match result {
        Ok(stats) => {
            info!(
                "Mirrored {} dirs, {} files ({} bytes)",
                stats.dirs_created, stats.files_copied, stats.bytes_copied
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{:#}", anyhow::Error::new(e));
            if opts.exit_zero {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
