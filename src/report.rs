use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// One locally-handled failure: the entry was skipped, siblings continued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Warning {
    /// Format tag the failure was detected under (e.g. "BYML", "SARC").
    pub format: String,
    /// Mirrored output path of the offending entry.
    pub path: PathBuf,
    pub message: String,
}

impl Warning {
    pub fn new(format: &str, path: &Path, message: impl Into<String>) -> Self {
        Self {
            format: format.to_string(),
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Could not decompile '{}': {}",
            self.format,
            self.path.display(),
            self.message
        )
    }
}

/// Shared collector for per-entry warnings. Tasks push from anywhere in the
/// extraction tree; the top level renders everything once at the end.
#[derive(Debug, Clone, Default)]
pub struct WarningSink {
    inner: Arc<Mutex<Vec<Warning>>>,
}

impl WarningSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, warning: Warning) {
        self.inner.lock().expect("warning sink poisoned").push(warning);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("warning sink poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Warning> {
        self.inner.lock().expect("warning sink poisoned").clone()
    }
}

/// Run-wide counters, updated by concurrent sibling tasks.
#[derive(Debug, Default)]
pub struct RunCounters {
    decoded: AtomicUsize,
    copied: AtomicUsize,
    containers: AtomicUsize,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_decoded(&self) {
        self.decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_copied(&self) {
        self.copied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_container(&self) {
        self.containers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decoded(&self) -> usize {
        self.decoded.load(Ordering::Relaxed)
    }

    pub fn copied(&self) -> usize {
        self.copied.load(Ordering::Relaxed)
    }

    pub fn containers(&self) -> usize {
        self.containers.load(Ordering::Relaxed)
    }
}

/// Final report for one decompilation run, rendered human-readable or as
/// JSON and optionally persisted next to the output tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output_root: PathBuf,
    pub artifacts_decoded: usize,
    pub files_copied: usize,
    pub containers_extracted: usize,
    pub warnings: Vec<Warning>,
    pub duration: Duration,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(
        input: &Path,
        output_root: &Path,
        counters: &RunCounters,
        warnings: Vec<Warning>,
        started: Instant,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            output_root: output_root.to_path_buf(),
            artifacts_decoded: counters.decoded(),
            files_copied: counters.copied(),
            containers_extracted: counters.containers(),
            warnings,
            duration: started.elapsed(),
            finished_at: Utc::now(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
