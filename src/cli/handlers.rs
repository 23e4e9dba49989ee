//! Argument parsing and the run handler

use std::path::PathBuf;

use clap::Parser;

use crate::engine::ScriptEngine;
use crate::error::{Result, TrazarError};
use crate::report::Reporter;
use crate::session::{Session, SessionConfig};
use crate::target::TargetRegistry;
use crate::workload::{ExplicitFiles, TraceDirectory, WorkloadSource};

/// Environment override for the default iteration cap
pub const ITERATIONS_ENV: &str = "TRAZAR_ITERATIONS";

/// Environment override for the trace directory
pub const TRACE_DIR_ENV: &str = "TRAZAR_TRACE_DIR";

/// Default trace directory when no files are given
pub const TRACE_DIR_DEFAULT: &str = "traces";

/// Trazar - trace-replay performance harness
///
/// Replays recorded rendering traces against every measurable target and
/// reports converged timing statistics for each pair.
///
/// Names given on the command line are substring matches, so
/// `trazar firefox` runs all firefox traces. Alternatively, a list of
/// trace filenames can be given to execute directly.
#[derive(Debug, Parser)]
#[command(name = "trazar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of iterations per test case (exact; disables early stopping)
    #[arg(short = 'i', long = "iterations", value_name = "N")]
    pub iterations: Option<usize>,

    /// List selected test case names without executing them
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Display each time measurement instead of summary statistics
    #[arg(short = 'r', long = "raw")]
    pub raw: bool,

    /// In raw mode, also show the summaries (on stderr)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Write the collected summary records to a JSON file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Test-name substrings, or trace filenames to execute
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}

/// Resolve the iteration cap from the environment
///
/// Absent or empty means the default; a malformed value is a fatal
/// configuration error.
fn iterations_from_env() -> Result<Option<usize>> {
    match std::env::var(ITERATIONS_ENV) {
        Ok(raw) if !raw.is_empty() => {
            let n = raw
                .parse::<usize>()
                .map_err(|_| TrazarError::InvalidConfiguration {
                    reason: format!("{ITERATIONS_ENV} is not an integer: '{raw}'"),
                })?;
            Ok(Some(n))
        }
        _ => Ok(None),
    }
}

/// Build the session configuration from arguments and environment
///
/// # Errors
/// Returns a configuration error for a zero iteration count or a
/// malformed `TRAZAR_ITERATIONS` value; nothing has been measured yet.
pub fn build_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = SessionConfig::default();

    if let Some(n) = cli.iterations {
        if n == 0 {
            return Err(TrazarError::InvalidConfiguration {
                reason: "iteration count must be at least 1".to_string(),
            });
        }
        config.iterations = n;
        config.exact_iterations = true;
    } else if let Some(n) = iterations_from_env()? {
        if n == 0 {
            return Err(TrazarError::InvalidConfiguration {
                reason: format!("{ITERATIONS_ENV} must be at least 1"),
            });
        }
        config.iterations = n;
    }

    config.raw = cli.raw;
    config.list_only = cli.list;
    config.json_output = cli.output.clone();
    Ok(config)
}

/// Choose the workload source: explicit trace files, or a directory scan
/// with the names acting as substring filters
fn select_source(cli: &Cli, config: &mut SessionConfig) -> Box<dyn WorkloadSource> {
    let paths: Vec<PathBuf> = cli.names.iter().map(PathBuf::from).collect();
    if ExplicitFiles::any_readable(&paths) {
        Box::new(ExplicitFiles::new(paths))
    } else {
        config.filters = cli.names.clone();
        let dir = std::env::var(TRACE_DIR_ENV).unwrap_or_else(|_| TRACE_DIR_DEFAULT.to_string());
        Box::new(TraceDirectory::new(dir))
    }
}

/// Run the measurement session with the built-in targets and engine
pub fn handle_run(cli: &Cli, mut config: SessionConfig) -> Result<()> {
    let source = select_source(cli, &mut config);

    let summary: Option<Box<dyn std::io::Write>> = if config.raw {
        cli.verbose.then(|| Box::new(std::io::stderr()) as Box<dyn std::io::Write>)
    } else {
        Some(Box::new(std::io::stdout()))
    };
    let raw: Option<Box<dyn std::io::Write>> = config
        .raw
        .then(|| Box::new(std::io::stdout()) as Box<dyn std::io::Write>);
    let mut reporter = Reporter::new(summary, raw);

    let registry = TargetRegistry::with_builtin_targets();
    let mut engine = ScriptEngine::new();

    let mut session = Session::new(config);
    session.run(&registry, source.as_ref(), &mut engine, &mut reporter)
}
