//! Command implementations and argument parsing for the `vecfix` binary.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{Span, field, info, instrument};
use vecfix_core::{
    DEFAULT_CLUSTER_COUNT, DEFAULT_CLUSTER_STD, DEFAULT_DIMENSIONS, DEFAULT_NUM_QUERIES,
    DEFAULT_NUM_VECTORS, DEFAULT_OUT_DIR, DEFAULT_SEED, FixtureConfig, FixtureEmitter,
    FixtureError, VerifyError, verify_all,
};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "vecfix",
    version,
    about = "Generate and verify clustered vector CSV fixtures."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Write the five fixture files.
    Generate(FixtureArgs),
    /// Check previously written fixture files against the same parameters.
    Verify(FixtureArgs),
}

impl Command {
    /// Name of the subcommand, as typed on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Generate(_) => "generate",
            Self::Verify(_) => "verify",
        }
    }
}

/// Fixture parameters shared by every command.
#[derive(Debug, Args, Clone, PartialEq)]
pub struct FixtureArgs {
    /// Directory receiving the fixture files.
    #[arg(long = "out-dir", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Rows in each vector file.
    #[arg(
        long = "num-vectors",
        default_value_t = DEFAULT_NUM_VECTORS,
        value_parser = clap::value_parser!(usize),
    )]
    pub num_vectors: usize,

    /// Rows in each query file.
    #[arg(
        long = "num-queries",
        default_value_t = DEFAULT_NUM_QUERIES,
        value_parser = clap::value_parser!(usize),
    )]
    pub num_queries: usize,

    /// Coordinates per vector.
    #[arg(
        long,
        default_value_t = DEFAULT_DIMENSIONS,
        value_parser = clap::value_parser!(usize),
    )]
    pub dimensions: usize,

    /// Number of cluster centers.
    #[arg(
        long,
        default_value_t = DEFAULT_CLUSTER_COUNT,
        value_parser = clap::value_parser!(usize),
    )]
    pub clusters: usize,

    /// Standard deviation of each coordinate around its center.
    #[arg(long = "cluster-std", default_value_t = DEFAULT_CLUSTER_STD)]
    pub cluster_std: f64,

    /// Seed for the random generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl Default for FixtureArgs {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            num_vectors: DEFAULT_NUM_VECTORS,
            num_queries: DEFAULT_NUM_QUERIES,
            dimensions: DEFAULT_DIMENSIONS,
            clusters: DEFAULT_CLUSTER_COUNT,
            cluster_std: DEFAULT_CLUSTER_STD,
            seed: DEFAULT_SEED,
        }
    }
}

impl FixtureArgs {
    /// Validates the arguments into a [`FixtureConfig`].
    ///
    /// # Errors
    /// Returns the configuration [`FixtureError`] raised by the builder.
    pub fn to_config(&self) -> Result<FixtureConfig, FixtureError> {
        FixtureConfig::builder()
            .with_out_dir(&self.out_dir)
            .with_num_vectors(self.num_vectors)
            .with_num_queries(self.num_queries)
            .with_dimensions(self.dimensions)
            .with_cluster_count(self.clusters)
            .with_cluster_std(self.cluster_std)
            .with_seed(self.seed)
            .build()
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration or emission failed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// A written fixture did not match its contract.
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

impl CliError {
    /// Stable machine-readable code of the underlying library error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Fixture(err) => err.code().as_str(),
            Self::Verify(err) => err.code().as_str(),
        }
    }
}

/// What a command did to the fixture set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Files were written.
    Generated,
    /// Files were read back and checked.
    Verified,
}

/// One fixture file touched by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// Path of the file.
    pub path: PathBuf,
    /// Data rows, excluding the header.
    pub rows: usize,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Whether files were generated or verified.
    pub outcome: Outcome,
    /// Files in emission order.
    pub files: Vec<FileSummary>,
    /// Parameters the command ran with.
    pub config: FixtureConfig,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when validation, emission, or verification fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use vecfix_cli::cli::{Cli, Command, FixtureArgs, Outcome, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let args = FixtureArgs {
///     out_dir: dir.path().to_path_buf(),
///     num_vectors: 10,
///     num_queries: 2,
///     ..FixtureArgs::default()
/// };
/// let summary = run_cli(Cli { command: Command::Generate(args) })?;
/// assert_eq!(summary.outcome, Outcome::Generated);
/// assert_eq!(summary.files.len(), 5);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    Span::current().record("command", field::display(cli.command.name()));
    match cli.command {
        Command::Generate(args) => run_generate(&args),
        Command::Verify(args) => run_verify(&args),
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(args),
    fields(out_dir = %args.out_dir.display(), seed = args.seed),
)]
pub(super) fn run_generate(args: &FixtureArgs) -> Result<ExecutionSummary, CliError> {
    let config = args.to_config()?;
    let report = FixtureEmitter::seeded(config.clone())?.emit()?;
    let files = report
        .files()
        .iter()
        .map(|file| FileSummary {
            path: file.path.clone(),
            rows: file.rows,
        })
        .collect::<Vec<_>>();
    info!(files = files.len(), "generate completed");
    Ok(ExecutionSummary {
        outcome: Outcome::Generated,
        files,
        config,
    })
}

#[instrument(
    name = "cli.verify",
    err,
    skip(args),
    fields(out_dir = %args.out_dir.display()),
)]
pub(super) fn run_verify(args: &FixtureArgs) -> Result<ExecutionSummary, CliError> {
    let config = args.to_config()?;
    let files = verify_all(&config)?
        .into_iter()
        .map(|fixture| FileSummary {
            path: config.out_dir().join(fixture.kind.file_name()),
            rows: fixture.rows.len(),
        })
        .collect::<Vec<_>>();
    info!(files = files.len(), "verify completed");
    Ok(ExecutionSummary {
        outcome: Outcome::Verified,
        files,
        config,
    })
}

/// Renders `summary` to `writer`: one line per file, then the parameter
/// summary line.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::path::PathBuf;
/// # use vecfix_cli::cli::{ExecutionSummary, FileSummary, Outcome, render_summary};
/// # use vecfix_core::FixtureConfig;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     outcome: Outcome::Verified,
///     files: vec![FileSummary { path: PathBuf::from("data/queries.csv"), rows: 50 }],
///     config: FixtureConfig::builder().build()?,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "Verified data/queries.csv (50 rows)\n\
///      dim=16, vectors=1000, queries=50, clusters=5, cluster_std=0.08\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    for file in &summary.files {
        match summary.outcome {
            Outcome::Generated => writeln!(writer, "Wrote {}", file.path.display())?,
            Outcome::Verified => {
                writeln!(writer, "Verified {} ({} rows)", file.path.display(), file.rows)?;
            }
        }
    }
    writeln!(writer, "{}", summary.config)
}
