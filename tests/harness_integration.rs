//! End-to-end tests for the measurement session
//!
//! Drives the public API the way the binary does: built-in targets, the
//! trace interpreter, and real (temporary) trace directories, asserting on
//! the rendered report output.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use trazar::engine::ScriptEngine;
use trazar::report::Reporter;
use trazar::session::{Session, SessionConfig};
use trazar::target::{ImageTarget, TargetRegistry};
use trazar::workload::TraceDirectory;

/// Test sink exposing everything written to it
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn trace_dir(names: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        std::fs::write(dir.path().join(name), "clear\n").unwrap();
    }
    dir
}

fn run_session(config: SessionConfig, dir: &tempfile::TempDir) -> (String, String) {
    let summary = SharedBuf::default();
    let raw = SharedBuf::default();
    let mut reporter = Reporter::new(
        (!config.raw).then(|| Box::new(summary.clone()) as Box<dyn Write>),
        config.raw.then(|| Box::new(raw.clone()) as Box<dyn Write>),
    );

    let mut session = Session::new(config);
    session
        .run(
            &TargetRegistry::with_builtin_targets(),
            &TraceDirectory::new(dir.path()),
            &mut ScriptEngine::new(),
            &mut reporter,
        )
        .unwrap();

    (summary.contents(), raw.contents())
}

#[test]
fn test_summary_scenario_noop_trace() {
    let dir = trace_dir(&["noop.trace"]);
    let (summary, _) = run_session(SessionConfig::default(), &dir);

    let line = summary
        .lines()
        .find(|l| l.starts_with("[  0]"))
        .expect("summary line for the pair");

    let fields: Vec<&str> = line.split_whitespace().collect();
    // [  0] image noop <min> <median> <pct>% <count>
    assert_eq!(fields[2], "image");
    assert_eq!(fields[3], "noop");

    let min_s: f64 = fields[4].parse().unwrap();
    let median_s: f64 = fields[5].parse().unwrap();
    let pct: f64 = fields[6].trim_end_matches('%').parse().unwrap();
    let count: usize = fields[7].parse().unwrap();

    assert!(min_s <= median_s, "min {min_s} > median {median_s}");
    assert!(pct >= 0.0);
    assert!(count >= 1 && count <= 15, "count {count} out of range");
}

#[test]
fn test_exact_iteration_counts_are_honored() {
    let dir = trace_dir(&["noop.trace"]);
    for k in [1_usize, 2, 5, 15] {
        let (summary, _) = run_session(
            SessionConfig {
                iterations: k,
                exact_iterations: true,
                ..SessionConfig::default()
            },
            &dir,
        );
        let line = summary.lines().find(|l| l.starts_with("[  0]")).unwrap();
        let count: usize = line.split_whitespace().last().unwrap().parse().unwrap();
        assert_eq!(count, k, "expected exactly {k} iterations");
    }
}

#[test]
fn test_raw_mode_streams_the_full_cap() {
    let dir = trace_dir(&["noop.trace"]);
    let (summary, raw) = run_session(
        SessionConfig {
            iterations: 8,
            raw: true,
            ..SessionConfig::default()
        },
        &dir,
    );

    assert!(summary.is_empty(), "raw mode suppresses the summary");

    let line = raw
        .lines()
        .find(|l| l.starts_with("[*]"))
        .expect("raw line for the pair");
    let fields: Vec<&str> = line.split_whitespace().collect();
    // [*] image.rgba noop.0 <ticks-per-ms> <v> * 8
    assert_eq!(fields[1], "image.rgba");
    assert_eq!(fields[2], "noop.0");
    assert_eq!(fields.len(), 4 + 8, "raw mode must run the full cap");
}

#[test]
fn test_name_filter_selects_matching_traces() {
    let dir = trace_dir(&["firefox-scroll.trace", "gtk-demo.trace"]);
    let (summary, _) = run_session(
        SessionConfig {
            iterations: 2,
            exact_iterations: true,
            filters: vec!["firefox".to_string()],
            ..SessionConfig::default()
        },
        &dir,
    );

    assert!(summary.contains("firefox-scroll"), "got: {summary}");
    assert!(!summary.contains("gtk-demo"), "got: {summary}");
}

#[test]
fn test_fallback_target_is_never_measured() {
    let dir = trace_dir(&["noop.trace"]);
    let summary = SharedBuf::default();
    let mut reporter = Reporter::new(Some(Box::new(summary.clone())), None);

    let mut registry = TargetRegistry::new();
    registry.register(Box::new(ImageTarget::new()));
    registry.register(Box::new(ImageTarget::fallback()));

    let mut session = Session::new(SessionConfig {
        iterations: 2,
        exact_iterations: true,
        ..SessionConfig::default()
    });
    session
        .run(
            &registry,
            &TraceDirectory::new(dir.path()),
            &mut ScriptEngine::new(),
            &mut reporter,
        )
        .unwrap();

    let output = summary.contents();
    assert!(output.contains(" image "), "got: {output}");
    assert!(!output.contains("image-fallback"), "got: {output}");
}

#[test]
fn test_each_measurable_target_gets_its_own_sequence() {
    let dir = trace_dir(&["a.trace", "b.trace"]);
    let summary = SharedBuf::default();
    let mut reporter = Reporter::new(Some(Box::new(summary.clone())), None);

    let mut registry = TargetRegistry::new();
    registry.register(Box::new(ImageTarget::new()));

    let mut session = Session::new(SessionConfig {
        iterations: 1,
        exact_iterations: true,
        ..SessionConfig::default()
    });
    session
        .run(
            &registry,
            &TraceDirectory::new(dir.path()),
            &mut ScriptEngine::new(),
            &mut reporter,
        )
        .unwrap();

    let output = summary.contents();
    let sequences: Vec<&str> = output
        .lines()
        .filter(|l| l.starts_with('['))
        .filter(|l| !l.starts_with("[ # ]"))
        .map(|l| l.split(']').next().unwrap())
        .collect();
    assert_eq!(sequences, vec!["[  0", "[  1"]);
}
