//! CSV rendering of raw samples.
//!
//! Detail files embed each worker's samples as CSV rows with the columns
//! `elapsedSeconds,opsPerSec,passed,sizeBytes,levels,writeAmp`. There is no
//! header row and no quoting: every column is numeric or boolean.

use crate::model::{Sample, WorkerRun};
use std::fmt::Write as _;

/// Format a single sample as a CSV row without a line terminator.
#[must_use]
pub fn format_sample_row(sample: &Sample) -> String {
    format!(
        "{},{},{},{},{},{:.2}",
        sample.elapsed_secs,
        sample.ops_per_sec,
        sample.passed,
        sample.size,
        sample.levels,
        sample.write_amp
    )
}

/// Format every sample of a worker run, each row terminated by `\n`.
#[must_use]
pub fn format_worker_run(run: &WorkerRun) -> String {
    let mut out = String::with_capacity(run.len() * 32);
    for sample in run.samples() {
        let _ = writeln!(out, "{}", format_sample_row(sample));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(elapsed_secs: i64, ops: i64, passed: bool, write_amp: f64) -> Sample {
        Sample {
            elapsed_secs,
            ops_per_sec: ops,
            passed,
            size: 1024,
            levels: 6,
            write_amp,
        }
    }

    #[test]
    fn test_format_sample_row() {
        assert_eq!(
            format_sample_row(&sample(5, 21375, true, 1.834)),
            "5,21375,true,1024,6,1.83"
        );
        assert_eq!(
            format_sample_row(&sample(10, 900, false, 2.0)),
            "10,900,false,1024,6,2.00"
        );
    }

    #[test]
    fn test_format_worker_run_terminates_rows() {
        let run = WorkerRun::new(vec![sample(1, 10, true, 1.0), sample(2, 20, false, 1.5)])
            .expect("non-empty");
        assert_eq!(
            format_worker_run(&run),
            "1,10,true,1024,6,1.00\n2,20,false,1024,6,1.50\n"
        );
    }
}
