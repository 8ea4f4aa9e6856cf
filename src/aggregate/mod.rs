//! In-memory aggregation tree.
//!
//! ```text
//! WorkloadSet
//! └── "values=1024"            Workload
//!     ├── "20230101"           Run
//!     │   ├── ".../1/a.log"    WorkerRun
//!     │   └── ".../1/b.log"    WorkerRun
//!     └── "20230102"           Run
//!         └── ...
//! ```
//!
//! All levels use sorted maps so that every traversal, and therefore every
//! artifact rendered from the tree, is deterministic.

use crate::model::{RunSummary, SUMMARY_FILENAME, Sample, WorkerRun, WorkloadSummary};
use std::collections::BTreeMap;
use std::path::{Component, Path};
use tracing::debug;

/// All worker runs for one workload on one day.
#[derive(Debug, Clone)]
pub struct Run {
    name: String,
    date: String,
    dir: String,
    worker_runs: BTreeMap<String, WorkerRun>,
}

impl Run {
    fn new(name: &str, date: &str, dir: String) -> Self {
        Self {
            name: name.to_string(),
            date: date.to_string(),
            dir,
            worker_runs: BTreeMap::new(),
        }
    }

    /// Workload name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Day of the run.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Source directory of the first file filed under this run, relative to
    /// the data root.
    #[must_use]
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Worker runs keyed by source file, in key order.
    #[must_use]
    pub const fn worker_runs(&self) -> &BTreeMap<String, WorkerRun> {
        &self.worker_runs
    }

    /// Name of this run's detail file.
    ///
    /// The source directory's components are joined with `-` and suffixed
    /// with `summary.json`, so `20230101/pebble/write/values=1024/1` becomes
    /// `20230101-pebble-write-values=1024-1-summary.json`.
    #[must_use]
    pub fn summary_filename(&self) -> String {
        let mut parts: Vec<String> = Path::new(&self.dir)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        parts.push(SUMMARY_FILENAME.to_string());
        parts.join("-")
    }

    /// Summarize the run by averaging its worker runs.
    ///
    /// Throughput uses truncating integer division; write amplification is
    /// rounded to two decimal places.
    #[must_use]
    pub fn summarize(&self) -> RunSummary {
        let count = self.worker_runs.len();
        let sum_ops: i128 = self
            .worker_runs
            .values()
            .map(|run| i128::from(run.ops_per_sec()))
            .sum();
        let sum_write_amp: f64 = self.worker_runs.values().map(WorkerRun::write_amp).sum();

        // Runs are only created alongside their first worker run.
        let divisor = i128::try_from(count.max(1)).unwrap_or(i128::MAX);
        let mean_write_amp = sum_write_amp / count.max(1) as f64;
        // A mean of i64 values always fits in i64.
        let ops_sec = i64::try_from(sum_ops / divisor).unwrap_or(i64::MAX);

        RunSummary {
            name: self.name.clone(),
            date: self.date.clone(),
            ops_sec,
            write_amp: (mean_write_amp * 100.0).round() / 100.0,
            summary_path: self.summary_filename(),
        }
    }
}

/// All runs for one workload, keyed by day.
#[derive(Debug, Clone, Default)]
pub struct Workload {
    days: BTreeMap<String, Run>,
}

impl Workload {
    /// Runs keyed by day, in ascending day order.
    #[must_use]
    pub const fn days(&self) -> &BTreeMap<String, Run> {
        &self.days
    }

    /// Day-sorted summary series for this workload.
    #[must_use]
    pub fn summarize(&self) -> WorkloadSummary {
        self.days.values().map(Run::summarize).collect()
    }
}

/// Root of the aggregation tree for one invocation.
#[derive(Debug, Clone, Default)]
pub struct WorkloadSet {
    workloads: BTreeMap<String, Workload>,
}

impl WorkloadSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File a worker run under `(name, day)`, keyed by its source path.
    ///
    /// Workload and run nodes are created on first use. A second worker run
    /// for the same source path replaces the first. Returns `true` if the
    /// worker run was inserted, `false` if it was dropped for having no
    /// samples.
    pub fn add_raw_run(
        &mut self,
        name: &str,
        day: &str,
        path: &str,
        samples: Vec<Sample>,
    ) -> bool {
        let Some(worker_run) = WorkerRun::new(samples) else {
            return false;
        };
        self.insert(name, day, path, worker_run);
        true
    }

    /// File an already-built worker run under `(name, day)`.
    pub fn insert(&mut self, name: &str, day: &str, path: &str, worker_run: WorkerRun) {
        debug!(
            workload = name,
            day,
            samples = worker_run.len(),
            file = path,
            "Adding raw run"
        );

        let workload = self.workloads.entry(name.to_string()).or_default();
        let run = workload.days.entry(day.to_string()).or_insert_with(|| {
            let dir = Path::new(path)
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            Run::new(name, day, dir)
        });
        run.worker_runs.insert(path.to_string(), worker_run);
    }

    /// Workloads keyed by name, in name order.
    #[must_use]
    pub const fn workloads(&self) -> &BTreeMap<String, Workload> {
        &self.workloads
    }

    /// Iterate every run across all workloads.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.workloads.values().flat_map(|w| w.days.values())
    }

    /// Day-sorted summary series for every workload.
    #[must_use]
    pub fn summarize(&self) -> BTreeMap<String, WorkloadSummary> {
        self.workloads
            .iter()
            .map(|(name, workload)| (name.clone(), workload.summarize()))
            .collect()
    }

    /// True if no worker run has been filed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workloads.is_empty()
    }
}
