//! Workload discovery and name filtering
//!
//! A workload is a file-resident replayable trace. Discovery sits behind
//! `WorkloadSource` so the measurement core never touches the filesystem
//! directly; the two providers cover the original harness's modes of
//! operation, a trace directory scan and an explicit file list.

use std::path::{Path, PathBuf};

use crate::error::{Result, TrazarError};

/// Extension recognized by the directory scanner
const TRACE_EXTENSION: &str = "trace";

/// A named, replayable trace file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    /// Path to the trace file
    pub path: PathBuf,
    /// Logical name: basename with everything from the first dot stripped
    pub name: String,
}

impl Workload {
    /// Create a workload from a path, deriving its logical name
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            name: logical_name(path),
        }
    }
}

/// Derive a workload's logical name from its path
///
/// `/a/b/shapes.trace` becomes `shapes`; a multi-dotted basename such as
/// `firefox-talos.0.trace` truncates at the first dot.
#[must_use]
pub fn logical_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    match base.find('.') {
        Some(dot) => base[..dot].to_string(),
        None => base,
    }
}

/// Does a logical name pass the session's substring filters?
///
/// No filters admits everything.
#[must_use]
pub fn matches_filters(name: &str, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }
    filters.iter().any(|f| name.contains(f.as_str()))
}

/// Finite, restartable enumeration of workloads
pub trait WorkloadSource {
    /// Enumerate the workloads this source provides
    ///
    /// # Errors
    /// Returns a discovery error when the source cannot produce any
    /// workloads at all.
    fn workloads(&self) -> Result<Vec<Workload>>;
}

/// Scans a directory for `.trace` files
pub struct TraceDirectory {
    dir: PathBuf,
}

impl TraceDirectory {
    /// Create a scanner over the given directory
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl WorkloadSource for TraceDirectory {
    fn workloads(&self) -> Result<Vec<Workload>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|_| TrazarError::NoWorkloads {
            dir: self.dir.clone(),
        })?;

        let mut found = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_trace = path
                .extension()
                .is_some_and(|ext| ext == TRACE_EXTENSION);
            if is_trace {
                found.push(Workload::from_path(&path));
            }
        }

        if found.is_empty() {
            return Err(TrazarError::NoWorkloads {
                dir: self.dir.clone(),
            });
        }

        // Directory order is filesystem-dependent; keep reports stable.
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(found)
    }
}

/// Explicit list of trace files given on the command line
pub struct ExplicitFiles {
    paths: Vec<PathBuf>,
}

impl ExplicitFiles {
    /// Create a source over the given paths
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Whether any path names a readable file
    ///
    /// One readable file is enough to treat the command-line names as
    /// explicit trace paths rather than substring filters; the unreadable
    /// ones are skipped during enumeration.
    #[must_use]
    pub fn any_readable(paths: &[PathBuf]) -> bool {
        paths.iter().any(|p| p.is_file())
    }
}

impl WorkloadSource for ExplicitFiles {
    fn workloads(&self) -> Result<Vec<Workload>> {
        Ok(self
            .paths
            .iter()
            .filter(|p| p.is_file())
            .map(|p| Workload::from_path(p))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_logical_name_strips_directory_and_extension() {
        assert_eq!(logical_name(Path::new("/a/b/shapes.trace")), "shapes");
    }

    #[test]
    fn test_logical_name_truncates_at_first_dot() {
        assert_eq!(
            logical_name(Path::new("traces/firefox-talos.0.trace")),
            "firefox-talos"
        );
    }

    #[test]
    fn test_logical_name_without_extension() {
        assert_eq!(logical_name(Path::new("/a/b/shapes")), "shapes");
    }

    #[test]
    fn test_filters_match_substrings() {
        let filters = vec!["firefox".to_string()];
        assert!(matches_filters("firefox-scroll", &filters));
        assert!(!matches_filters("gtk-demo", &filters));
    }

    #[test]
    fn test_no_filters_admits_all() {
        assert!(matches_filters("anything", &[]));
    }

    #[test]
    fn test_any_of_several_filters_admits() {
        let filters = vec!["gtk".to_string(), "swfdec".to_string()];
        assert!(matches_filters("swfdec-giant-steps", &filters));
        assert!(!matches_filters("firefox-scroll", &filters));
    }

    #[test]
    fn test_directory_scan_finds_only_trace_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.trace", "b.trace", "notes.txt"] {
            let mut f = std::fs::File::create(dir.path().join(name)).unwrap();
            writeln!(f, "clear").unwrap();
        }

        let source = TraceDirectory::new(dir.path());
        let found = source.workloads().unwrap();
        let names: Vec<&str> = found.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_directory_is_a_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = TraceDirectory::new(dir.path());
        assert!(matches!(
            source.workloads(),
            Err(TrazarError::NoWorkloads { .. })
        ));
    }

    #[test]
    fn test_missing_directory_is_a_discovery_error() {
        let source = TraceDirectory::new("/nonexistent/trazar-traces");
        assert!(matches!(
            source.workloads(),
            Err(TrazarError::NoWorkloads { .. })
        ));
    }

    #[test]
    fn test_explicit_files_skip_unreadable_entries() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.trace");
        std::fs::write(&good, "clear\n").unwrap();

        let source = ExplicitFiles::new(vec![good.clone(), dir.path().join("missing.trace")]);
        let found = source.workloads().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "good");
    }

    #[test]
    fn test_any_readable_rejects_pure_name_filters() {
        assert!(!ExplicitFiles::any_readable(&[PathBuf::from("firefox")]));
        assert!(!ExplicitFiles::any_readable(&[]));
    }

    #[test]
    fn test_one_readable_file_among_names_counts_as_paths() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.trace");
        std::fs::write(&good, "clear\n").unwrap();

        assert!(ExplicitFiles::any_readable(&[
            good,
            PathBuf::from("firefox")
        ]));
    }
}
