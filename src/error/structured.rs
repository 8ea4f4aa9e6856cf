//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

use crate::error::MkbenchError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Input Errors (exit code 2) ===
    /// Raw data directory missing
    DataDirNotFound,

    // === Summary Errors (exit code 3) ===
    /// Existing summary could not be read
    SummaryReadFailed,
    /// Existing summary is malformed
    SummaryMalformed,
    /// Output artifact could not be written
    OutputWriteFailed,
    /// Another invocation holds the lock
    SummaryLocked,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DataDirNotFound => "DATA_DIR_NOT_FOUND",
            Self::SummaryReadFailed => "SUMMARY_READ_FAILED",
            Self::SummaryMalformed => "SUMMARY_MALFORMED",
            Self::OutputWriteFailed => "OUTPUT_WRITE_FAILED",
            Self::SummaryLocked => "SUMMARY_LOCKED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether re-running the same command later might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::SummaryLocked)
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Input errors
    /// - 3: Summary errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DataDirNotFound => 2,
            Self::SummaryReadFailed
            | Self::SummaryMalformed
            | Self::OutputWriteFailed
            | Self::SummaryLocked => 3,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `MkbenchError`.
    #[must_use]
    pub fn from_error(err: &MkbenchError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);

        Self {
            code,
            message: err.to_string(),
            hint: err.suggestion().map(str::to_string),
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Render as the JSON envelope written to stderr.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Render for a human reader, optionally with ANSI color.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &MkbenchError) -> (ErrorCode, Option<Value>) {
        let path_context = |path: &std::path::Path| Some(json!({"path": path.display().to_string()}));
        match err {
            MkbenchError::DataDirNotFound { path } => {
                (ErrorCode::DataDirNotFound, path_context(path))
            }
            MkbenchError::SummaryRead { path, .. } => {
                (ErrorCode::SummaryReadFailed, path_context(path))
            }
            MkbenchError::SummaryParse { path, source } => (
                ErrorCode::SummaryMalformed,
                Some(json!({
                    "path": path.display().to_string(),
                    "line": source.line(),
                    "column": source.column(),
                })),
            ),
            MkbenchError::OutputWrite { path, .. } => {
                (ErrorCode::OutputWriteFailed, path_context(path))
            }
            MkbenchError::SummaryLocked { path } => (ErrorCode::SummaryLocked, path_context(path)),
            MkbenchError::Config(_) => (ErrorCode::ConfigError, None),
            MkbenchError::Io(_) => (ErrorCode::IoError, None),
            MkbenchError::Json(_) => (ErrorCode::JsonError, None),
            MkbenchError::Yaml(_) => (ErrorCode::YamlError, None),
            MkbenchError::WithContext { context, .. } => {
                (ErrorCode::InternalError, Some(json!({"context": context})))
            }
        }
    }
}
