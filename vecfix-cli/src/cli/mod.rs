//! Command-line interface orchestration for `vecfix`.
//!
//! `generate` writes the five fixture files; `verify` reads them back with the
//! same parameters and checks their column contract.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, FileSummary, FixtureArgs, Outcome, render_summary,
    run_cli,
};

#[cfg(test)]
mod test_helpers;
