//! Per-pair measurement loop
//!
//! `TraceRunner` executes one (target, workload) pair end to end: surface
//! acquisition, the timed replay loop, the adaptive stop decision, and the
//! final summary emission. The target's cleanup hook runs on every exit
//! path, including measurement failures mid-loop.

use crate::clock::{Tick, TickClock};
use crate::convergence::{ConvergenceController, ConvergenceState};
use crate::engine::{ReplayContext, ReplayEngine};
use crate::error::{Result, TrazarError};
use crate::report::Reporter;
use crate::session::SessionConfig;
use crate::stats::Statistics;
use crate::target::{Content, Surface, Target};
use crate::workload::Workload;

/// Runs the timed replay loop for one (target, workload) pair
pub struct TraceRunner {
    clock: TickClock,
    controller: ConvergenceController,
}

impl TraceRunner {
    /// Create a runner; one instance serves a whole session
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: TickClock::new(),
            controller: ConvergenceController::new(),
        }
    }

    /// Measure one pair, appending elapsed ticks into `samples`
    ///
    /// The buffer is session-owned and cleared here at the start of each
    /// pair. `sequence` is the per-target report-ordering label.
    ///
    /// # Errors
    /// Surface-creation, replay, and clock failures propagate to the
    /// session, which reports them and moves on to the next pair.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        target: &dyn Target,
        workload: &Workload,
        config: &SessionConfig,
        engine: &mut dyn ReplayEngine,
        samples: &mut Vec<Tick>,
        reporter: &mut Reporter,
        sequence: usize,
    ) -> Result<()> {
        samples.clear();
        self.controller.reset();

        let mut surface = target
            .create_surface(Content::ColorAlpha, 1, 1)
            .map_err(|_| TrazarError::SurfaceCreation {
                target: target.name().to_string(),
            })?;
        self.clock.set_synchronize(target.sync_hook());

        let want_summary = reporter.summary_enabled() || config.json_output.is_some();
        if want_summary {
            reporter.pair_prefix(sequence, target.name(), &workload.name)?;
        }

        let result = self.measure(
            target,
            workload,
            config,
            engine,
            samples,
            reporter,
            surface.as_mut(),
            want_summary,
        );

        target.cleanup();
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn measure(
        &mut self,
        target: &dyn Target,
        workload: &Workload,
        config: &SessionConfig,
        engine: &mut dyn ReplayEngine,
        samples: &mut Vec<Tick>,
        reporter: &mut Reporter,
        surface: &mut dyn Surface,
        want_summary: bool,
    ) -> Result<()> {
        for i in 0..config.iterations {
            self.clock.yield_before_measurement();
            self.clock.start();

            let mut ctx = ReplayContext::new(surface, target);
            engine.replay(&mut ctx, workload)?;
            // Queue a trivial write so stop() times completed work, not
            // merely enqueued commands.
            surface.clear();

            let elapsed = self.clock.stop()?;
            samples.push(elapsed);

            if reporter.raw_enabled() {
                reporter.raw_sample(
                    target.name(),
                    &target.content().to_string(),
                    &workload.name,
                    elapsed,
                    i == 0,
                )?;
            } else if !config.exact_iterations
                && self.controller.observe(samples) == ConvergenceState::Converged
            {
                break;
            }
        }

        if want_summary {
            if let Some(stats) = Statistics::compute(samples) {
                reporter.summary_stats(&stats)?;
            }
        }
        if reporter.raw_enabled() {
            reporter.raw_finish()?;
        }
        Ok(())
    }
}

impl Default for TraceRunner {
    fn default() -> Self {
        Self::new()
    }
}
