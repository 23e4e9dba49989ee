//! Descriptive statistics over growing sample buffers
//!
//! Statistics are immutable snapshots computed over a prefix of the
//! per-pair sample buffer. The buffer itself is never reordered; the
//! computation sorts a copy so that convergence checks taken mid-session
//! see samples in collection order.

use serde::{Deserialize, Serialize};

use crate::clock::Tick;

/// Snapshot of descriptive statistics over a sample prefix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Smallest elapsed-tick value in the prefix
    pub min_ticks: Tick,
    /// Median elapsed-tick value (mean of the central pair for even n)
    pub median_ticks: f64,
    /// Relative standard deviation: population std dev / mean, as a fraction
    pub std_dev: f64,
    /// Number of samples the snapshot was computed over
    pub iterations: usize,
}

impl Statistics {
    /// Compute statistics over a non-empty sample prefix
    ///
    /// Returns `None` for an empty slice. A single sample has a relative
    /// standard deviation of 0 by definition.
    #[must_use]
    pub fn compute(samples: &[Tick]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len();
        let n_f64 = n as f64;

        let min_ticks = *samples.iter().min().unwrap_or(&0);

        let mut sorted: Vec<Tick> = samples.to_vec();
        sorted.sort_unstable();
        let median_ticks = if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
        };

        let mean = samples.iter().map(|&t| t as f64).sum::<f64>() / n_f64;
        let std_dev = if n < 2 || mean.abs() < f64::EPSILON {
            0.0
        } else {
            let variance = samples
                .iter()
                .map(|&t| {
                    let diff = t as f64 - mean;
                    diff * diff
                })
                .sum::<f64>()
                / n_f64;
            variance.sqrt() / mean
        };

        Some(Self {
            min_ticks,
            median_ticks,
            std_dev,
            iterations: n,
        })
    }
}
