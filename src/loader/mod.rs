//! The `write` pipeline.
//!
//! [`WriteLoader`] owns every piece of state for one invocation: the
//! aggregation tree being built, the summaries loaded from the previous
//! invocation and the ingest report. Stages run in order:
//!
//! 1. [`WriteLoader::load_cooked`] reads the previous summary.
//! 2. [`WriteLoader::load_raw`] walks the data root and files new samples.
//! 3. [`WriteLoader::cook_summary`] merges and writes `summary.json`.
//! 4. [`WriteLoader::cook_run_summaries`] writes one detail file per new run.

pub mod lock;

pub use lock::{LOCK_FILENAME, SummaryLock};

use crate::aggregate::WorkloadSet;
use crate::config::WriteConfig;
use crate::cook::{CookedSummaries, merge_summaries, write_run_details, write_summary};
use crate::error::{MkbenchError, Result};
use crate::ingest::{
    Diagnostic, FileOutcome, IngestReport, SkippedFile, classify_path, open_input, parse_reader,
};
use crate::util::progress::ScanProgress;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

/// Result of a completed `write` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct WriteReport {
    pub data_dir: PathBuf,
    pub summary_dir: PathBuf,
    /// Path of the written top-level summary.
    pub summary_path: PathBuf,
    /// Detail files written for newly summarized runs.
    pub detail_files: Vec<PathBuf>,
    /// Workloads in the written summary, cooked ones included.
    pub workloads: usize,
    /// Runs summarized by this invocation.
    pub new_runs: usize,
    pub ingest: IngestReport,
}

/// Owned state of one `write` invocation.
#[derive(Debug)]
pub struct WriteLoader {
    config: WriteConfig,
    workloads: WorkloadSet,
    cooked: CookedSummaries,
    report: IngestReport,
}

impl WriteLoader {
    #[must_use]
    pub fn new(config: WriteConfig) -> Self {
        Self {
            config,
            workloads: WorkloadSet::new(),
            cooked: CookedSummaries::default(),
            report: IngestReport::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &WriteConfig {
        &self.config
    }

    /// Runs filed by this invocation.
    #[must_use]
    pub const fn workloads(&self) -> &WorkloadSet {
        &self.workloads
    }

    #[must_use]
    pub const fn cooked(&self) -> &CookedSummaries {
        &self.cooked
    }

    #[must_use]
    pub const fn report(&self) -> &IngestReport {
        &self.report
    }

    /// Load the summary written by a previous invocation, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary exists but cannot be read or parsed.
    pub fn load_cooked(&mut self) -> Result<()> {
        self.cooked = CookedSummaries::load(&self.config.summary_dir)?;
        Ok(())
    }

    /// Walk the data root and file every new worker run.
    ///
    /// # Errors
    ///
    /// Returns [`MkbenchError::DataDirNotFound`] if the data root is not a
    /// directory. Problems with individual files are recorded in the report.
    pub fn load_raw(&mut self, progress: &ScanProgress) -> Result<()> {
        let root = self.config.data_dir.clone();
        if !root.is_dir() {
            return Err(MkbenchError::DataDirNotFound { path: root });
        }

        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let rel = err
                        .path()
                        .map(|p| relative_display(&root, p))
                        .unwrap_or_default();
                    warn!(file = %rel, error = %err, "Skipping unwalkable entry");
                    self.report
                        .diagnostics
                        .push(Diagnostic::unreadable(&rel, &io::Error::from(err)));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let rel_path = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            self.report.files_seen += 1;
            progress.file_visited(&rel_path.to_string_lossy());

            let Some(data) = classify_path(rel_path) else {
                trace!(file = %rel_path.display(), "Ignoring file outside data layout");
                self.report.files_ignored += 1;
                continue;
            };

            self.load_file(entry.path(), &data.rel, &data.day);
        }

        info!(
            files = self.report.files_seen,
            runs = self.report.runs_added,
            samples = self.report.samples_added,
            skipped = self.report.skipped.len(),
            diagnostics = self.report.diagnostics.len(),
            "Scanned raw data"
        );
        Ok(())
    }

    fn load_file(&mut self, path: &Path, rel: &str, day: &str) {
        let reader = match open_input(path) {
            Ok(reader) => reader,
            Err(err) => {
                warn!(file = rel, error = %err, "Skipping unreadable file");
                self.report.diagnostics.push(Diagnostic::unreadable(rel, &err));
                return;
            }
        };

        let parsed = parse_reader(reader, rel, day, self.cooked.set());
        self.report.diagnostics.extend(parsed.diagnostics);

        match parsed.outcome {
            FileOutcome::Parsed { name, samples } => {
                let count = samples.len();
                if self.workloads.add_raw_run(&name, day, rel, samples) {
                    self.report.runs_added += 1;
                    self.report.samples_added += count;
                }
            }
            FileOutcome::NoRecords => {
                debug!(file = rel, "No usable records");
            }
            FileOutcome::SkippedCooked { name } => {
                self.report.skipped.push(SkippedFile {
                    path: rel.to_string(),
                    workload: name,
                    day: day.to_string(),
                });
            }
        }
    }

    /// Merge fresh and cooked series and write the top-level summary.
    ///
    /// Returns the summary path and the number of workloads written.
    ///
    /// # Errors
    ///
    /// Returns [`MkbenchError::OutputWrite`] if the summary cannot be written.
    pub fn cook_summary(&self) -> Result<(PathBuf, usize)> {
        let merged = merge_summaries(self.workloads.summarize(), self.cooked.summaries());
        let path = write_summary(&self.config.summary_dir, &merged)?;
        Ok((path, merged.len()))
    }

    /// Write a detail file for every run filed by this invocation.
    ///
    /// # Errors
    ///
    /// Returns [`MkbenchError::OutputWrite`] on the first failed write.
    pub fn cook_run_summaries(&self) -> Result<Vec<PathBuf>> {
        write_run_details(&self.config.summary_dir, &self.workloads)
    }

    fn into_report(
        self,
        summary_path: PathBuf,
        detail_files: Vec<PathBuf>,
        workloads: usize,
    ) -> WriteReport {
        WriteReport {
            new_runs: self.workloads.runs().count(),
            data_dir: self.config.data_dir,
            summary_dir: self.config.summary_dir,
            summary_path,
            detail_files,
            workloads,
            ingest: self.report,
        }
    }
}

/// Run the whole pipeline with a scan spinner shown on terminals.
///
/// # Errors
///
/// See [`parse_write_with_progress`].
pub fn parse_write(config: &WriteConfig) -> Result<WriteReport> {
    let progress = ScanProgress::start("Scanning raw data");
    let result = parse_write_with_progress(config, &progress);
    progress.finish();
    result
}

/// Run the whole pipeline.
///
/// # Errors
///
/// Returns an error if the summary directory cannot be created or locked,
/// the data root is missing, the previous summary is unreadable or
/// malformed, or an output artifact cannot be written.
pub fn parse_write_with_progress(
    config: &WriteConfig,
    progress: &ScanProgress,
) -> Result<WriteReport> {
    fs::create_dir_all(&config.summary_dir)
        .map_err(|e| MkbenchError::output_write(&config.summary_dir, e))?;

    let _lock = if config.lock {
        Some(SummaryLock::acquire(&config.summary_dir)?)
    } else {
        debug!("Summary lock disabled");
        None
    };

    let mut loader = WriteLoader::new(config.clone());
    loader.load_cooked()?;
    loader.load_raw(progress)?;
    let (summary_path, workloads) = loader.cook_summary()?;
    let detail_files = loader.cook_run_summaries()?;

    Ok(loader.into_report(summary_path, detail_files, workloads))
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
