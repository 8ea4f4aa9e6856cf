//! Rendering of the two output artifacts.
//!
//! - The top-level summary: workload name -> date-sorted [`RunSummary`]
//!   series.
//! - One detail file per run: source file -> [`RunDetail`].
//!
//! Both are pretty-printed JSON with a trailing newline. Object keys come
//! from sorted maps, so identical input always renders identical bytes.

pub mod csv;

pub use csv::{format_sample_row, format_worker_run};

use crate::aggregate::Run;
use crate::error::Result;
use crate::model::{RunDetail, WorkloadSummary};
use serde::Serialize;
use std::collections::BTreeMap;

/// Serialize `value` as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Render the top-level summary artifact.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_summary(summary: &BTreeMap<String, WorkloadSummary>) -> Result<Vec<u8>> {
    pretty_json(summary)
}

/// Build the detail entries for a run, keyed by source file.
#[must_use]
pub fn run_details(run: &Run) -> BTreeMap<&str, RunDetail> {
    run.worker_runs()
        .iter()
        .map(|(path, worker_run)| {
            (
                path.as_str(),
                RunDetail {
                    ops_sec: worker_run.ops_per_sec(),
                    raw_data: format_worker_run(worker_run),
                },
            )
        })
        .collect()
}

/// Render a run's detail artifact.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_run_detail(run: &Run) -> Result<Vec<u8>> {
    pretty_json(&run_details(run))
}
