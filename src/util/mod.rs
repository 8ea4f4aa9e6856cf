//! Shared utilities for `mkbench`.
//!
//! - Elapsed-duration parsing for benchmark records
//! - Progress indicators for the raw data scan
//! - Atomic file writes for output artifacts

pub mod duration;
pub mod progress;

pub use duration::{DurationError, parse_duration_nanos, parse_elapsed_secs};

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write `bytes` to `path` through a sibling temp file and a rename.
///
/// A crash mid-write leaves either the previous file or the new one, never a
/// truncated mix.
///
/// # Errors
///
/// Returns any I/O error from creating, writing, syncing, or renaming.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let result = write_and_sync(&temp_path, bytes).and_then(|()| fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.into_inner().map_err(io::IntoInnerError::into_error)?.sync_all()
}
