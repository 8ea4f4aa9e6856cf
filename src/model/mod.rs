//! Core data types for `mkbench`.
//!
//! The write-throughput benchmark runs as a cluster of independent worker
//! machines. Each worker prints periodic [`Sample`]s; all samples from one
//! worker's output file form a [`WorkerRun`]. The aggregation of these into
//! per-day runs and per-workload series lives in [`crate::aggregate`].

use crate::reduce::find_optimal_split;
use serde::{Deserialize, Serialize};

/// Filename of the top-level summary, and suffix of every per-run detail file.
pub const SUMMARY_FILENAME: &str = "summary.json";

/// A single measurement emitted by a benchmark worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the worker started, truncated.
    pub elapsed_secs: i64,
    /// Throughput over the sampling interval.
    pub ops_per_sec: i64,
    /// Whether the interval met the benchmark's target.
    pub passed: bool,
    /// Value size in bytes.
    pub size: u64,
    /// Number of LSM levels at sampling time.
    pub levels: i64,
    /// Cumulative write amplification.
    pub write_amp: f64,
}

/// All samples from one worker's output file.
///
/// The representative throughput is fixed at construction, so a
/// `WorkerRun` never changes after it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerRun {
    samples: Vec<Sample>,
    ops_per_sec: i64,
}

impl WorkerRun {
    /// Build a worker run from its samples in emission order.
    ///
    /// Returns `None` for an empty sample sequence: such files carry no
    /// usable data and are never aggregated.
    #[must_use]
    pub fn new(samples: Vec<Sample>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let (passes, fails): (Vec<&Sample>, Vec<&Sample>) =
            samples.iter().partition(|s| s.passed);
        let passes: Vec<i64> = passes.iter().map(|s| s.ops_per_sec).collect();
        let fails: Vec<i64> = fails.iter().map(|s| s.ops_per_sec).collect();
        let ops_per_sec = find_optimal_split(&passes, &fails);

        Some(Self {
            samples,
            ops_per_sec,
        })
    }

    /// The samples, in the order the worker emitted them.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Representative throughput: the optimal pass/fail split.
    #[must_use]
    pub const fn ops_per_sec(&self) -> i64 {
        self.ops_per_sec
    }

    /// Write amplification at the end of the run.
    #[must_use]
    pub fn write_amp(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.write_amp)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; empty runs cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One point of a workload's time series: the summary of one day's run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Workload name, e.g. `values=1024`.
    pub name: String,
    /// Day of the run, as found in the data path (e.g. `20230101`).
    pub date: String,
    /// Mean representative throughput over the day's worker runs.
    pub ops_sec: i64,
    /// Mean final write amplification, rounded to 2 decimal places.
    pub write_amp: f64,
    /// Detail file name, relative to the summary directory.
    pub summary_path: String,
}

/// Per-day series for one workload, sorted by date.
pub type WorkloadSummary = Vec<RunSummary>;

/// One worker's entry in a per-run detail file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDetail {
    #[serde(rename = "opsSec")]
    pub ops_sec: i64,
    #[serde(rename = "rawData")]
    pub raw_data: String,
}
