//! Write command implementation.
//!
//! Loads configuration, runs the summarizing pipeline and prints a short
//! report: human text by default, the full [`WriteReport`] with `--json`.

use crate::cli::WriteArgs;
use crate::config::{CliOverrides, load_write_config};
use crate::error::Result;
use crate::loader::{WriteReport, parse_write};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Diagnostics listed individually before the text output is abbreviated.
const MAX_LISTED_DIAGNOSTICS: usize = 10;

/// Execute the write command.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the pipeline fails.
pub fn execute(args: &WriteArgs, config: Option<PathBuf>, json: bool, quiet: bool) -> Result<()> {
    let overrides = CliOverrides {
        config,
        data_dir: args.data_dir.clone(),
        summary_dir: args.summary_dir.clone(),
        no_lock: args.no_lock,
    };
    let config = load_write_config(&overrides)?;
    debug!(
        data_dir = %config.data_dir.display(),
        summary_dir = %config.summary_dir.display(),
        lock = config.lock,
        "Resolved write config"
    );

    let report = parse_write(&config)?;
    if report.ingest.has_diagnostics() {
        warn!(
            count = report.ingest.diagnostics.len(),
            "Some input could not be used"
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !quiet {
        print!("{}", render_text(&report));
    }
    Ok(())
}

/// Human-readable report.
#[must_use]
pub fn render_text(report: &WriteReport) -> String {
    let ingest = &report.ingest;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Scanned {} files in {}: {} worker runs added ({} samples), {} ignored",
        ingest.files_seen,
        report.data_dir.display(),
        ingest.runs_added,
        ingest.samples_added,
        ingest.files_ignored
    );

    let skipped = ingest.skipped_pairs();
    if !skipped.is_empty() {
        let _ = writeln!(
            out,
            "Skipped {} already summarized workload days ({} files)",
            skipped.len(),
            ingest.skipped.len()
        );
    }

    let _ = writeln!(
        out,
        "Wrote {} ({} workloads, {} new runs, {} detail files)",
        report.summary_path.display(),
        report.workloads,
        report.new_runs,
        report.detail_files.len()
    );

    if ingest.has_diagnostics() {
        let _ = writeln!(out, "{} problems:", ingest.diagnostics.len());
        for diagnostic in ingest.diagnostics.iter().take(MAX_LISTED_DIAGNOSTICS) {
            let _ = writeln!(out, "  {}", diagnostic.summary());
        }
        let hidden = ingest.diagnostics.len().saturating_sub(MAX_LISTED_DIAGNOSTICS);
        if hidden > 0 {
            let _ = writeln!(out, "  ... and {hidden} more (use --json for all)");
        }
    }

    out
}
