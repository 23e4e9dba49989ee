//! Top-level measurement session
//!
//! The session drives the cross-product of targets and workloads. Per-pair
//! failures are isolated: a pair that cannot be measured is reported on
//! stderr and skipped, never aborting the rest of the matrix. Retries are
//! deliberately absent, since re-running a failed measurement would bias
//! the statistics of its neighbors.

use std::path::PathBuf;

use crate::clock::Tick;
use crate::convergence::ITERATIONS_DEFAULT;
use crate::engine::ReplayEngine;
use crate::error::Result;
use crate::report::Reporter;
use crate::runner::TraceRunner;
use crate::target::{is_measurable, TargetRegistry};
use crate::workload::{matches_filters, WorkloadSource};

/// Fixed configuration for one session run
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Iteration cap per (target, workload) pair
    pub iterations: usize,
    /// Run exactly `iterations` trials, ignoring convergence
    pub exact_iterations: bool,
    /// Stream raw per-sample output instead of summaries
    pub raw: bool,
    /// List selected workload names without measuring
    pub list_only: bool,
    /// Substring filters over workload logical names; empty admits all
    pub filters: Vec<String>,
    /// Optional JSON results file for the collected summary records
    pub json_output: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            iterations: ITERATIONS_DEFAULT,
            exact_iterations: false,
            raw: false,
            list_only: false,
            filters: Vec::new(),
            json_output: None,
        }
    }
}

/// Drives TraceRunner over every eligible (target, workload) pair
pub struct Session {
    config: SessionConfig,
    samples: Vec<Tick>,
    runner: TraceRunner,
}

impl Session {
    /// Create a session; the sample buffer is sized to the iteration cap
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let samples = Vec::with_capacity(config.iterations);
        Self {
            config,
            samples,
            runner: TraceRunner::new(),
        }
    }

    /// Session configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the target × workload matrix
    ///
    /// In listing mode the selected workload names are printed once and no
    /// target is touched; the measurability filter is bypassed.
    ///
    /// # Errors
    /// Workload discovery failures and report-sink I/O failures are fatal.
    /// Per-pair measurement failures are reported and skipped.
    pub fn run(
        &mut self,
        registry: &TargetRegistry,
        source: &dyn WorkloadSource,
        engine: &mut dyn ReplayEngine,
        reporter: &mut Reporter,
    ) -> Result<()> {
        let workloads = source.workloads()?;

        if self.config.list_only {
            for workload in &workloads {
                if matches_filters(&workload.name, &self.config.filters) {
                    reporter.list_name(&workload.name)?;
                }
            }
            return Ok(());
        }

        reporter.session_header()?;

        for target in registry.iter() {
            if !is_measurable(target) {
                continue;
            }

            let mut sequence = 0;
            for workload in &workloads {
                if !matches_filters(&workload.name, &self.config.filters) {
                    continue;
                }

                match self.runner.run(
                    target,
                    workload,
                    &self.config,
                    engine,
                    &mut self.samples,
                    reporter,
                    sequence,
                ) {
                    Ok(()) => sequence += 1,
                    Err(err) => {
                        // A pair that failed mid-measurement may have left
                        // a dangling report line; its sequence label is
                        // spent either way.
                        if reporter.pair_abort()? {
                            sequence += 1;
                        }
                        eprintln!("Error: {err}; skipping {}/{}", target.name(), workload.name);
                    }
                }
            }
        }

        if let Some(path) = &self.config.json_output {
            reporter.write_json(path)?;
        }
        Ok(())
    }
}
