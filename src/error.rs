//! Error types for the trazar harness
//!
//! The taxonomy mirrors how failures propagate: measurement errors are
//! reported and the offending (target, workload) pair is skipped,
//! configuration errors abort before any measurement begins, and discovery
//! errors abort the sub-session that needed the workloads.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the harness
#[derive(Debug, Error)]
pub enum TrazarError {
    /// The monotonic clock reported a stop tick before the start tick
    #[error("Clock skew: stop tick precedes start tick")]
    ClockSkew,

    /// `stop()` was called without a matching `start()`
    #[error("Timer stopped without being started")]
    TimerNotStarted,

    /// The target's surface factory failed
    #[error("Failed to create target surface: {target}")]
    SurfaceCreation {
        /// Name of the target whose factory failed
        target: String,
    },

    /// Replay of a workload against a surface failed
    #[error("Replay of '{workload}' failed: {reason}")]
    Replay {
        /// Logical name of the workload being replayed
        workload: String,
        /// Description of the failure
        reason: String,
    },

    /// A configuration value could not be parsed or is out of range
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
    },

    /// No workloads were found where the session expected them
    #[error("Found no traces in '{}'. Set TRAZAR_TRACE_DIR to point to your traces?", dir.display())]
    NoWorkloads {
        /// Directory that was searched
        dir: PathBuf,
    },

    /// Underlying I/O failure (directory scans, report sinks)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization of benchmark results failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, TrazarError>;
