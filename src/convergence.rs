//! Adaptive stop-rule for the measurement loop
//!
//! Fixed iteration counts either waste wall-clock time on quiet machines
//! or stop too early on noisy ones. The controller instead watches the
//! relative standard deviation of everything collected so far and stops
//! once it has stayed under a threshold for a run of consecutive samples.

use crate::clock::Tick;
use crate::stats::Statistics;

/// Default iteration cap per (target, workload) pair
pub const ITERATIONS_DEFAULT: usize = 15;

/// Relative standard deviation below which a sample counts as quiet
pub const LOW_STD_DEV: f64 = 0.05;

/// Samples that must be collected before convergence is evaluated
pub const MIN_STD_DEV_COUNT: usize = 3;

/// Consecutive quiet samples required to declare convergence
pub const STABLE_STD_DEV_COUNT: usize = 3;

/// Sampling state of one (target, workload) measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceState {
    /// Still collecting samples
    Sampling,
    /// Measurements judged stable; terminal
    Converged,
}

/// Decides when a sequence of measurements has stabilized
///
/// Scoped to one (target, workload) pair; `reset()` reuses the controller
/// for the next pair.
#[derive(Debug, Clone)]
pub struct ConvergenceController {
    /// Relative std dev threshold for a quiet sample
    pub threshold: f64,
    /// Minimum sample count before the rule is evaluated
    pub min_samples: usize,
    /// Consecutive quiet samples required to stop
    pub stability_count: usize,
    low_std_dev_streak: usize,
    state: ConvergenceState,
}

impl Default for ConvergenceController {
    fn default() -> Self {
        Self {
            threshold: LOW_STD_DEV,
            min_samples: MIN_STD_DEV_COUNT,
            stability_count: STABLE_STD_DEV_COUNT,
            low_std_dev_streak: 0,
            state: ConvergenceState::Sampling,
        }
    }
}

impl ConvergenceController {
    /// Create a controller with the standard thresholds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> ConvergenceState {
        self.state
    }

    /// Evaluate the stop rule after a new sample was appended
    ///
    /// `samples` is the full prefix collected so far for the current pair.
    /// Returns the state after evaluation; `Converged` is terminal.
    pub fn observe(&mut self, samples: &[Tick]) -> ConvergenceState {
        if self.state == ConvergenceState::Converged {
            return self.state;
        }
        if samples.len() <= self.min_samples {
            return self.state;
        }

        let Some(stats) = Statistics::compute(samples) else {
            return self.state;
        };

        if stats.std_dev <= self.threshold {
            self.low_std_dev_streak += 1;
            if self.low_std_dev_streak >= self.stability_count {
                self.state = ConvergenceState::Converged;
            }
        } else {
            self.low_std_dev_streak = 0;
        }

        self.state
    }

    /// Rearm for the next (target, workload) pair
    pub fn reset(&mut self) {
        self.low_std_dev_streak = 0;
        self.state = ConvergenceState::Sampling;
    }
}
