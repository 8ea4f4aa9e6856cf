//! Incremental merge of previously summarized ("cooked") data.
//!
//! Every invocation starts by loading the top-level summary written by the
//! previous one. Its `(workload, date)` pairs form the [`CookedSet`]: raw
//! files for those pairs are skipped during ingestion, so a day is only ever
//! reduced once. At the end the freshly computed series are merged with the
//! cooked ones and written back.

use crate::aggregate::WorkloadSet;
use crate::error::{MkbenchError, Result};
use crate::format::{render_run_detail, render_summary};
use crate::model::{SUMMARY_FILENAME, WorkloadSummary};
use crate::util::write_atomic;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A `(workload, day)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameDay {
    pub name: String,
    pub day: String,
}

impl NameDay {
    #[must_use]
    pub fn new(name: impl Into<String>, day: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            day: day.into(),
        }
    }
}

/// Membership filter over `(workload, day)` pairs already summarized.
#[derive(Debug, Clone, Default)]
pub struct CookedSet {
    pairs: HashSet<NameDay>,
}

impl CookedSet {
    /// True if `(name, day)` was summarized by a previous invocation.
    #[must_use]
    pub fn contains(&self, name: &str, day: &str) -> bool {
        self.pairs.contains(&NameDay::new(name, day))
    }

    pub fn insert(&mut self, name: &str, day: &str) {
        self.pairs.insert(NameDay::new(name, day));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Summaries loaded from a previous invocation.
#[derive(Debug, Clone, Default)]
pub struct CookedSummaries {
    summaries: BTreeMap<String, WorkloadSummary>,
    set: CookedSet,
}

impl CookedSummaries {
    /// Build from already-parsed summaries.
    #[must_use]
    pub fn from_summaries(summaries: BTreeMap<String, WorkloadSummary>) -> Self {
        let mut set = CookedSet::default();
        for (name, workload) in &summaries {
            for run in workload {
                set.insert(name, &run.date);
            }
        }
        Self { summaries, set }
    }

    /// Load `summary.json` from `summary_dir`.
    ///
    /// A missing file means this is the first invocation and yields an empty
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`MkbenchError::SummaryRead`] if the file exists but cannot be
    /// read, and [`MkbenchError::SummaryParse`] if it is not a valid summary.
    pub fn load(summary_dir: &Path) -> Result<Self> {
        let path = summary_path(summary_dir);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No previous summary; starting afresh");
                return Ok(Self::default());
            }
            Err(source) => return Err(MkbenchError::SummaryRead { path, source }),
        };

        let summaries: BTreeMap<String, WorkloadSummary> = serde_json::from_slice(&bytes)
            .map_err(|source| MkbenchError::SummaryParse {
                path: path.clone(),
                source,
            })?;

        let cooked = Self::from_summaries(summaries);
        info!(
            workloads = cooked.summaries.len(),
            days = cooked.set.len(),
            path = %path.display(),
            "Loaded cooked summary"
        );
        Ok(cooked)
    }

    /// The `(workload, day)` filter.
    #[must_use]
    pub const fn set(&self) -> &CookedSet {
        &self.set
    }

    /// Cooked series keyed by workload name.
    #[must_use]
    pub const fn summaries(&self) -> &BTreeMap<String, WorkloadSummary> {
        &self.summaries
    }
}

/// Path of the top-level summary inside `summary_dir`.
#[must_use]
pub fn summary_path(summary_dir: &Path) -> PathBuf {
    summary_dir.join(SUMMARY_FILENAME)
}

/// Merge freshly computed series with cooked ones.
///
/// For a workload present in both, the fresh entries come first, the
/// concatenation is stably sorted by date, and later entries with an
/// already-seen date are dropped. Fresh data therefore wins a date collision,
/// which can only happen if two invocations raced on the same directory.
/// Workloads present in only one input pass through unchanged.
#[must_use]
pub fn merge_summaries(
    fresh: BTreeMap<String, WorkloadSummary>,
    cooked: &BTreeMap<String, WorkloadSummary>,
) -> BTreeMap<String, WorkloadSummary> {
    let mut merged = fresh;

    for (name, cooked_series) in cooked {
        match merged.get_mut(name) {
            None => {
                merged.insert(name.clone(), cooked_series.clone());
            }
            Some(series) => {
                series.extend(cooked_series.iter().cloned());
                series.sort_by(|a, b| a.date.cmp(&b.date));
                let before = series.len();
                series.dedup_by(|later, earlier| later.date == earlier.date);
                if series.len() != before {
                    warn!(
                        workload = %name,
                        dropped = before - series.len(),
                        "Dropped duplicate dates while merging cooked summary"
                    );
                }
            }
        }
    }

    merged
}

/// Write the top-level summary artifact.
///
/// # Errors
///
/// Returns [`MkbenchError::OutputWrite`] if the file cannot be written.
pub fn write_summary(
    summary_dir: &Path,
    summary: &BTreeMap<String, WorkloadSummary>,
) -> Result<PathBuf> {
    let path = summary_path(summary_dir);
    let bytes = render_summary(summary)?;
    write_atomic(&path, &bytes).map_err(|e| MkbenchError::output_write(&path, e))?;
    info!(path = %path.display(), workloads = summary.len(), "Wrote summary");
    Ok(path)
}

/// Write one detail artifact per run in `workloads`.
///
/// # Errors
///
/// Returns [`MkbenchError::OutputWrite`] on the first file that cannot be
/// written.
pub fn write_run_details(summary_dir: &Path, workloads: &WorkloadSet) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for run in workloads.runs() {
        let path = summary_dir.join(run.summary_filename());
        let bytes = render_run_detail(run)?;
        write_atomic(&path, &bytes).map_err(|e| MkbenchError::output_write(&path, e))?;
        debug!(
            path = %path.display(),
            workload = run.name(),
            day = run.date(),
            worker_runs = run.worker_runs().len(),
            "Wrote run detail"
        );
        written.push(path);
    }
    Ok(written)
}
