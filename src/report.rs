//! Report sinks for summary and raw output
//!
//! Summary lines keep the original harness's fixed-width columns so
//! existing comparison scripts keep working:
//!
//! ```text
//! [  0]    image                       shapes    0.001    0.001  0.32%  15
//! ```
//!
//! Raw mode streams every sample as it is taken, one line per
//! (target, workload) pair, prefixed with the ticks-per-millisecond
//! conversion constant.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::{Tick, TickClock};
use crate::error::Result;
use crate::stats::Statistics;

/// Render a float the way C's `%g` does: shortest of fixed and
/// scientific notation, six significant digits, no trailing zeros.
///
/// The raw-line ticks-per-ms constant goes through this, so a
/// nanosecond clock prints as `1e+06` rather than `1000000`.
fn compact_float(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    #[allow(clippy::cast_possible_truncation)]
    let exp = value.abs().log10().floor() as i32;
    if (-4..6).contains(&exp) {
        let precision = usize::try_from((5 - exp).max(0)).unwrap_or(0);
        let mut fixed = format!("{value:.precision$}");
        if fixed.contains('.') {
            while fixed.ends_with('0') {
                fixed.pop();
            }
            if fixed.ends_with('.') {
                fixed.pop();
            }
        }
        fixed
    } else {
        let sci = format!("{value:.5e}");
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let mut mantissa = mantissa.to_string();
        if mantissa.contains('.') {
            while mantissa.ends_with('0') {
                mantissa.pop();
            }
            if mantissa.ends_with('.') {
                mantissa.pop();
            }
        }
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// One summary row, also the JSON output schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Per-target test sequence number
    pub sequence: usize,
    /// Target name
    pub target: String,
    /// Workload logical name
    pub workload: String,
    /// Minimum elapsed time in seconds
    pub min_s: f64,
    /// Median elapsed time in seconds
    pub median_s: f64,
    /// Relative standard deviation in percent
    pub std_dev_pct: f64,
    /// Samples actually collected
    pub iterations: usize,
}

/// Writes summary and raw measurement output
///
/// Either sink may be absent: raw mode normally suppresses the summary,
/// and summary mode never produces raw lines.
pub struct Reporter {
    summary: Option<Box<dyn Write>>,
    raw: Option<Box<dyn Write>>,
    pending: Option<(usize, String, String)>,
    raw_open: bool,
    records: Vec<SummaryRecord>,
}

impl Reporter {
    /// Create a reporter over the given sinks
    #[must_use]
    pub fn new(summary: Option<Box<dyn Write>>, raw: Option<Box<dyn Write>>) -> Self {
        Self {
            summary,
            raw,
            pending: None,
            raw_open: false,
            records: Vec::new(),
        }
    }

    /// Whether raw per-sample output is enabled
    #[must_use]
    pub fn raw_enabled(&self) -> bool {
        self.raw.is_some()
    }

    /// Whether summary output is enabled
    #[must_use]
    pub fn summary_enabled(&self) -> bool {
        self.summary.is_some()
    }

    /// Emit the once-per-session column headers
    ///
    /// # Errors
    /// Propagates sink I/O failures.
    pub fn session_header(&mut self) -> Result<()> {
        if let Some(raw) = &mut self.raw {
            writeln!(
                raw,
                "[ # ] backend.content test-size ticks-per-ms time(ticks) ..."
            )?;
        }
        if let Some(summary) = &mut self.summary {
            writeln!(
                summary,
                "[ # ] {:>8} {:>28} {:>8} {:>5} {:>5} iterations",
                "backend", "test", "min(s)", "median(s)", "stddev."
            )?;
        }
        Ok(())
    }

    /// Emit the summary prefix for a pair before its measurement starts
    ///
    /// # Errors
    /// Propagates sink I/O failures.
    pub fn pair_prefix(&mut self, sequence: usize, target: &str, workload: &str) -> Result<()> {
        self.pending = Some((sequence, target.to_string(), workload.to_string()));
        if let Some(summary) = &mut self.summary {
            write!(summary, "[{sequence:3}] {target:>8} {workload:>28} ")?;
            summary.flush()?;
        }
        Ok(())
    }

    /// Stream one raw sample; the first carries the pair's line prefix
    ///
    /// # Errors
    /// Propagates sink I/O failures.
    pub fn raw_sample(
        &mut self,
        target: &str,
        content: &str,
        workload: &str,
        value: Tick,
        first: bool,
    ) -> Result<()> {
        if let Some(raw) = &mut self.raw {
            if first {
                let ticks_per_ms =
                    compact_float(TickClock::ticks_per_second() as f64 / 1000.0);
                write!(raw, "[*] {target}.{content} {workload}.0 {ticks_per_ms}")?;
            }
            write!(raw, " {value}")?;
            raw.flush()?;
            self.raw_open = true;
        }
        Ok(())
    }

    /// Terminate the pair's raw line
    ///
    /// # Errors
    /// Propagates sink I/O failures.
    pub fn raw_finish(&mut self) -> Result<()> {
        if let Some(raw) = &mut self.raw {
            writeln!(raw)?;
            raw.flush()?;
        }
        self.raw_open = false;
        Ok(())
    }

    /// Cancel a pair whose measurement failed after output began
    ///
    /// Terminates the dangling summary prefix (marking the row FAILED) and
    /// any open raw line so the next pair's record starts on its own line,
    /// and drops the pending record. Returns whether there was anything to
    /// cancel, i.e. whether the failed pair consumed a sequence label.
    ///
    /// # Errors
    /// Propagates sink I/O failures.
    pub fn pair_abort(&mut self) -> Result<bool> {
        let mut aborted = self.pending.take().is_some();
        if aborted {
            if let Some(summary) = &mut self.summary {
                writeln!(summary, "FAILED")?;
                summary.flush()?;
            }
        }
        if self.raw_open {
            self.raw_open = false;
            aborted = true;
            if let Some(raw) = &mut self.raw {
                writeln!(raw)?;
                raw.flush()?;
            }
        }
        Ok(aborted)
    }

    /// Complete the pending pair's summary line from its final statistics
    ///
    /// # Errors
    /// Propagates sink I/O failures.
    pub fn summary_stats(&mut self, stats: &Statistics) -> Result<()> {
        let tps = TickClock::ticks_per_second() as f64;
        let min_s = stats.min_ticks as f64 / tps;
        let median_s = stats.median_ticks / tps;
        let std_dev_pct = stats.std_dev * 100.0;

        if let Some((sequence, target, workload)) = self.pending.take() {
            self.records.push(SummaryRecord {
                sequence,
                target,
                workload,
                min_s,
                median_s,
                std_dev_pct,
                iterations: stats.iterations,
            });
        }

        if let Some(summary) = &mut self.summary {
            writeln!(
                summary,
                "{min_s:8.3} {median_s:8.3} {std_dev_pct:5.2}% {:3}",
                stats.iterations
            )?;
            summary.flush()?;
        }
        Ok(())
    }

    /// Print a workload's logical name (listing mode)
    ///
    /// # Errors
    /// Propagates sink I/O failures.
    pub fn list_name(&mut self, name: &str) -> Result<()> {
        if let Some(summary) = &mut self.summary {
            writeln!(summary, "{name}")?;
        }
        Ok(())
    }

    /// Summary records collected so far
    #[must_use]
    pub fn records(&self) -> &[SummaryRecord] {
        &self.records
    }

    /// Write the collected summary records as JSON
    ///
    /// # Errors
    /// Propagates serialization and file I/O failures.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
