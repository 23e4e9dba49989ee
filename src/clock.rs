//! Monotonic tick source for measurement loops
//!
//! Ticks are nanoseconds from a monotonic clock. The conversion rate is
//! fixed for the lifetime of the process, so deltas taken in one session
//! stay comparable across (target, workload) pairs.

use std::time::Instant;

use crate::error::{Result, TrazarError};

/// Elapsed-tick value for one completed trial
pub type Tick = u64;

/// Fixed tick rate: one tick per nanosecond
const TICKS_PER_SECOND: u64 = 1_000_000_000;

/// Hook that blocks until a target's asynchronous rendering has completed
pub type SyncHook = Box<dyn Fn()>;

/// Monotonic high-resolution timer with an optional completion hook
///
/// The hook, when installed, runs between issuing rendering work and
/// reading the stop tick, so the measured delta covers completed work
/// rather than merely enqueued work. Targets whose completion is
/// synchronous install no hook.
pub struct TickClock {
    start: Option<Instant>,
    synchronize: Option<SyncHook>,
}

impl TickClock {
    /// Create a clock with no synchronization hook
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: None,
            synchronize: None,
        }
    }

    /// Install or clear the target's completion hook
    pub fn set_synchronize(&mut self, hook: Option<SyncHook>) {
        self.synchronize = hook;
    }

    /// Ticks per second of the underlying clock
    #[must_use]
    pub fn ticks_per_second() -> u64 {
        TICKS_PER_SECOND
    }

    /// Relinquish the scheduling quantum before a measurement
    ///
    /// Called immediately before `start()` so an already-queued unrelated
    /// task runs now instead of preempting mid-measurement.
    pub fn yield_before_measurement(&self) {
        std::thread::yield_now();
    }

    /// Record the baseline tick
    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Record the end tick and return the elapsed delta
    ///
    /// Runs the synchronization hook first when one is installed.
    ///
    /// # Errors
    /// Returns `TrazarError::TimerNotStarted` if `start()` was never
    /// called, and `TrazarError::ClockSkew` if the clock reports a stop
    /// tick before the start tick.
    pub fn stop(&mut self) -> Result<Tick> {
        if let Some(sync) = &self.synchronize {
            sync();
        }

        let start = self.start.take().ok_or(TrazarError::TimerNotStarted)?;
        let elapsed = Instant::now()
            .checked_duration_since(start)
            .ok_or(TrazarError::ClockSkew)?;

        Ok(elapsed.as_nanos() as Tick)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
