//! Small helpers shared across CLI tests.

use std::path::Path;

use super::{Cli, CliError, Command, ExecutionSummary, FixtureArgs, render_summary, run_cli};

/// Arguments for a small fixture set written under `out_dir`.
pub(super) fn small_args(out_dir: &Path) -> FixtureArgs {
    FixtureArgs {
        out_dir: out_dir.to_path_buf(),
        num_vectors: 12,
        num_queries: 3,
        dimensions: 4,
        clusters: 3,
        ..FixtureArgs::default()
    }
}

pub(super) fn generate(args: FixtureArgs) -> ExecutionSummary {
    match run_cli(Cli {
        command: Command::Generate(args),
    }) {
        Ok(summary) => summary,
        Err(err) => panic!("generate failed: {err}"),
    }
}

pub(super) fn run_cli_expecting_error(command: Command, panic_msg: &str) -> CliError {
    match run_cli(Cli { command }) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn rendered(summary: &ExecutionSummary) -> String {
    let mut buffer = Vec::new();
    if let Err(err) = render_summary(summary, &mut buffer) {
        panic!("rendering into memory failed: {err}");
    }
    match String::from_utf8(buffer) {
        Ok(text) => text,
        Err(err) => panic!("summary is not UTF-8: {err}"),
    }
}
