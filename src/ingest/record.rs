//! Parsing of tagged benchmark record lines.
//!
//! A record line looks like:
//!
//! ```text
//! BenchmarkRawvalues=1024 21375 ops/sec true pass 5s elapsed 1024 bytes 6 levels 1.830000 writeAmp
//! ```
//!
//! The tag is glued to the workload name. Everything after it is a
//! whitespace-separated sequence of values, each followed by a fixed unit
//! word.

use crate::model::Sample;
use crate::util::{DurationError, parse_elapsed_secs};
use std::str::FromStr;
use thiserror::Error;

/// Prefix marking a benchmark record line.
pub const RECORD_TAG: &str = "BenchmarkRaw";

/// Unit words following each value, in order.
const UNIT_WORDS: [&str; 6] = ["ops/sec", "pass", "elapsed", "bytes", "levels", "writeAmp"];

/// Total whitespace-separated fields in a record (name + 6 value/unit pairs).
const FIELD_COUNT: usize = 1 + 2 * UNIT_WORDS.len();

/// A successfully parsed record line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Benchmark workload name, e.g. `values=1024`.
    pub name: String,
    pub sample: Sample,
}

/// Why a tagged line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("expected {expected:?}, found {found:?}")]
    UnitWord {
        expected: &'static str,
        found: String,
    },

    #[error("empty benchmark name")]
    EmptyName,

    #[error("invalid {field} {value:?}: {reason}")]
    Field {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// Parse one line of worker output.
///
/// Returns `None` for lines without the record tag, which are ordinary log
/// noise. Tagged lines yield either a [`Record`] or the reason they were
/// rejected.
#[must_use]
pub fn parse_record(line: &str) -> Option<Result<Record, RecordError>> {
    let rest = line.strip_prefix(RECORD_TAG)?;
    Some(parse_fields(rest))
}

fn parse_fields(rest: &str) -> Result<Record, RecordError> {
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return Err(RecordError::EmptyName);
    }

    let fields: Vec<&str> = rest.split_whitespace().collect();
    if fields.len() != FIELD_COUNT {
        return Err(RecordError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    for (i, expected) in UNIT_WORDS.iter().enumerate() {
        let found = fields[2 + 2 * i];
        if found != *expected {
            return Err(RecordError::UnitWord {
                expected,
                found: found.to_string(),
            });
        }
    }

    let name = fields[0].to_string();
    let ops_per_sec = parse_number("ops/sec", fields[1])?;
    let passed = parse_bool_token(fields[3]).ok_or_else(|| RecordError::Field {
        field: "pass",
        value: fields[3].to_string(),
        reason: "not a boolean".to_string(),
    })?;
    let elapsed_secs = parse_elapsed_secs(fields[5])?;
    let size = parse_number("bytes", fields[7])?;
    let levels = parse_number("levels", fields[9])?;
    let write_amp: f64 = parse_number("writeAmp", fields[11])?;
    if !write_amp.is_finite() {
        return Err(RecordError::Field {
            field: "writeAmp",
            value: fields[11].to_string(),
            reason: "not finite".to_string(),
        });
    }

    Ok(Record {
        name,
        sample: Sample {
            elapsed_secs,
            ops_per_sec,
            passed,
            size,
            levels,
            write_amp,
        },
    })
}

fn parse_number<T>(field: &'static str, value: &str) -> Result<T, RecordError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| RecordError::Field {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a boolean token in any of the spellings benchmark tooling emits.
#[must_use]
pub fn parse_bool_token(token: &str) -> Option<bool> {
    match token {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
