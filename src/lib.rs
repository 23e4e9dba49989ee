//! # Trazar
//!
//! Trace-replay performance harness with adaptive, convergence-based
//! sampling.
//!
//! Trazar (Spanish: "to trace, to plot") replays recorded rendering
//! workloads against a set of pluggable targets and reports stable timing
//! statistics for each (target, workload) pair. Instead of a fixed trial
//! count, the measurement loop watches the relative standard deviation of
//! the samples collected so far and stops once it has stayed under 5% for
//! three consecutive trials, trading wall-clock time for statistical
//! confidence.
//!
//! ## Example
//!
//! ```rust
//! use trazar::convergence::{ConvergenceController, ConvergenceState};
//!
//! let mut ctrl = ConvergenceController::new();
//! let quiet = vec![100_u64; 6];
//!
//! let mut state = ConvergenceState::Sampling;
//! for n in 1..=quiet.len() {
//!     state = ctrl.observe(&quiet[..n]);
//! }
//! assert_eq!(state, ConvergenceState::Converged);
//! ```
//!
//! ## Architecture
//!
//! - [`clock`]: monotonic tick source with an optional completion hook
//! - [`stats`]: descriptive statistics over the growing sample buffer
//! - [`convergence`]: the adaptive stop-rule
//! - [`runner`]: the per-pair measurement loop
//! - [`target`]: rendering targets and the measurability policy
//! - [`workload`]: trace discovery and name filtering
//! - [`session`]: the target × workload driver
//!
//! Execution is strictly sequential: one pair runs to completion before
//! the next begins, because concurrent measurement would feed scheduling
//! noise into the very quantity being measured.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // tick -> f64 for statistics is safe
#![allow(clippy::cast_possible_truncation)] // nanosecond deltas fit in u64
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

/// Monotonic tick source for measurement loops
pub mod clock;
/// Adaptive stop-rule for the measurement loop
pub mod convergence;
/// Workload replay engine interface and the built-in trace interpreter
pub mod engine;
pub mod error;
/// Summary and raw report sinks
pub mod report;
/// Per-pair measurement loop
pub mod runner;
/// Top-level measurement session
pub mod session;
/// Descriptive statistics over sample buffers
pub mod stats;
/// Rendering targets and the measurability policy
pub mod target;
/// Workload discovery and name filtering
pub mod workload;

/// CLI command implementations (extracted for testability)
pub mod cli;

pub use error::{Result, TrazarError};
