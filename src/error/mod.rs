//! Error types and handling for `mkbench`.
//!
//! Only failures that abort an invocation live here. Per-file and per-line
//! problems met while ingesting raw logs are not errors: they are collected as
//! [`crate::ingest::Diagnostic`] values and processing continues.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Provides recovery hints for user-facing errors
//! - Provides structured JSON output via [`StructuredError`]

mod context;
mod structured;

pub use context::{OptionExt, ResultExt};
pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `mkbench` operations.
#[derive(Error, Debug)]
pub enum MkbenchError {
    // === Input Errors ===
    /// The raw data directory does not exist.
    #[error("Data directory not found at '{path}'")]
    DataDirNotFound { path: PathBuf },

    // === Summary Errors ===
    /// The previously written top-level summary could not be read.
    #[error("Failed to read summary '{path}': {source}")]
    SummaryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The previously written top-level summary is not valid JSON.
    #[error("Malformed summary '{path}': {source}")]
    SummaryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An output artifact could not be written.
    #[error("Failed to write '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another invocation holds the summary directory lock.
    #[error("Summary directory is locked: {path}")]
    SummaryLocked { path: PathBuf },

    // === Configuration Errors ===
    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === Wrapped errors ===
    /// Error with additional context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl MkbenchError {
    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::DataDirNotFound { .. } => {
                Some("Pass --data-dir or set MKBENCH_DATA_DIR to the raw data root")
            }
            Self::SummaryParse { .. } => {
                Some("Restore summary.json from a previous run or remove it to rebuild")
            }
            Self::SummaryLocked { .. } => Some(
                "Wait for the other mkbench invocation to finish, or remove the stale lock file",
            ),
            Self::Config(_) => Some("Check .mkbench.yaml and MKBENCH_* environment variables"),
            _ => None,
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        StructuredError::from_error(self).code.exit_code()
    }

    /// Wrap an I/O failure on an output artifact.
    #[must_use]
    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }
}

/// Result type using `MkbenchError`.
pub type Result<T> = std::result::Result<T, MkbenchError>;
