//! Advisory lock on the summary directory.
//!
//! Two invocations sharing a summary directory would each read the old
//! summary and the second write would discard the first one's results. The
//! lock is a marker file created with `create_new`; it is removed when the
//! guard drops.

use crate::error::{MkbenchError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Lock file name inside the summary directory.
pub const LOCK_FILENAME: &str = ".mkbench.lock";

/// Held lock; released on drop.
#[derive(Debug)]
pub struct SummaryLock {
    path: PathBuf,
}

impl SummaryLock {
    /// Take the lock in `summary_dir`, which must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`MkbenchError::SummaryLocked`] if the lock file already exists
    /// and [`MkbenchError::OutputWrite`] if it cannot be created.
    pub fn acquire(summary_dir: &Path) -> Result<Self> {
        let path = summary_dir.join(LOCK_FILENAME);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(MkbenchError::SummaryLocked { path });
            }
            Err(err) => return Err(MkbenchError::output_write(&path, err)),
        };

        writeln!(file, "{}", std::process::id()).map_err(|e| MkbenchError::output_write(&path, e))?;
        debug!(path = %path.display(), "Acquired summary lock");
        Ok(Self { path })
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SummaryLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %err, "Failed to remove summary lock");
        }
    }
}
