//! Raw benchmark file ingestion.
//!
//! This module handles:
//! - Recognizing data files by their relative path
//!   (`day/pebble/write/workload/run/file`)
//! - Transparent `.gz` / `.bz2` decompression
//! - Parsing a file's lines into samples, collecting [`Diagnostic`]s for
//!   anything that had to be skipped
//!
//! Nothing here is fatal. A file that cannot be opened or decoded, or a line
//! that cannot be parsed, is reported and ingestion stumbles forward.

pub mod record;

pub use record::{RECORD_TAG, Record, RecordError, parse_record};

use crate::cook::CookedSet;
use crate::model::Sample;
use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use serde::Serialize;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Component, Path};
use tracing::{info, warn};

/// Minimum number of relative path components of a data file.
pub const MIN_PATH_COMPONENTS: usize = 6;

/// Path component (index 2) marking write-throughput data.
pub const WRITE_SEGMENT: &str = "write";

/// Kind of a recoverable ingestion problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// File could not be opened, read, or decompressed.
    UnreadableFile,
    /// Tagged line with the wrong shape or an unparseable field.
    MalformedRecord,
    /// Tagged line whose elapsed duration could not be parsed.
    InvalidDuration,
    /// Record whose benchmark name differs from the file's first record.
    NameMismatch,
}

/// A recoverable problem met while ingesting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Path relative to the data root.
    pub path: String,
    /// 1-based line number, when the problem is tied to a line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    fn new(
        kind: DiagnosticKind,
        path: &str,
        line: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path: path.to_string(),
            line,
            message: message.into(),
        }
    }

    /// File-level diagnostic for an unreadable input.
    #[must_use]
    pub fn unreadable(path: &str, err: &io::Error) -> Self {
        Self::new(DiagnosticKind::UnreadableFile, path, None, err.to_string())
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{line}: {}", self.path, self.message),
            None => format!("{}: {}", self.path, self.message),
        }
    }
}

/// A file skipped because its `(workload, day)` was already cooked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub workload: String,
    pub day: String,
}

/// Counts and diagnostics for one ingestion pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// Regular files visited under the data root.
    pub files_seen: usize,
    /// Files outside the data path convention.
    pub files_ignored: usize,
    /// Files that produced a worker run.
    pub runs_added: usize,
    /// Samples across all added worker runs.
    pub samples_added: usize,
    /// Files skipped because their day was already cooked.
    pub skipped: Vec<SkippedFile>,
    /// Recoverable problems, in discovery order.
    pub diagnostics: Vec<Diagnostic>,
}

impl IngestReport {
    /// True if any recoverable problem was recorded.
    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Distinct `(workload, day)` pairs that were skipped.
    #[must_use]
    pub fn skipped_pairs(&self) -> std::collections::BTreeSet<(String, String)> {
        self.skipped
            .iter()
            .map(|s| (s.workload.clone(), s.day.clone()))
            .collect()
    }
}

/// Location of a data file, decoded from its relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPath {
    /// Day of the run (first component).
    pub day: String,
    /// Relative path, used as the worker run's key.
    pub rel: String,
}

/// Decode a path relative to the data root.
///
/// Returns `None` for paths with fewer than six components or whose third
/// component is not `write`; such files are not write-throughput data.
#[must_use]
pub fn classify_path(rel: &Path) -> Option<DataPath> {
    let parts: Vec<&OsStr> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    if parts.len() < MIN_PATH_COMPONENTS || parts[2] != WRITE_SEGMENT {
        return None;
    }

    Some(DataPath {
        day: parts[0].to_string_lossy().into_owned(),
        rel: rel.to_string_lossy().into_owned(),
    })
}

/// Open a data file, decompressing by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = match path.extension().and_then(OsStr::to_str) {
        Some("gz") => Box::new(MultiGzDecoder::new(file)),
        Some("bz2") => Box::new(BzDecoder::new(file)),
        _ => Box::new(file),
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Outcome of parsing one file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// At least one record parsed; `name` comes from the first of them.
    Parsed { name: String, samples: Vec<Sample> },
    /// No record line could be parsed.
    NoRecords,
    /// The file's `(workload, day)` was already cooked.
    SkippedCooked { name: String },
}

/// Parsed file together with its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub outcome: FileOutcome,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse every line of `reader` as worker output for `day`.
///
/// The first valid record fixes the file's benchmark name. If `(name, day)`
/// is in `cooked`, parsing stops and the file is reported as skipped before
/// any sample is kept. Later records with a different name are reported
/// and kept. Invalid UTF-8 is decoded lossily, so it only affects its own
/// line. An I/O error ends the file early, keeping samples parsed so far.
pub fn parse_reader<R: BufRead>(
    reader: R,
    rel: &str,
    day: &str,
    cooked: &CookedSet,
) -> ParsedFile {
    let mut diagnostics = Vec::new();
    let mut samples = Vec::new();
    let mut name: Option<String> = None;

    for (index, line) in reader.split(b'\n').enumerate() {
        let line_no = index + 1;
        let bytes = match line {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(file = rel, line = line_no, error = %err, "Read failed; keeping earlier samples");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnreadableFile,
                    rel,
                    Some(line_no),
                    err.to_string(),
                ));
                break;
            }
        };

        // Undecodable bytes become U+FFFD; such a line is noise unless tagged.
        let line = String::from_utf8_lossy(&bytes);
        let line = line.strip_suffix('\r').unwrap_or(&line);

        let Some(parsed) = parse_record(line) else {
            continue;
        };
        let record = match parsed {
            Ok(record) => record,
            Err(err) => {
                let kind = match err {
                    RecordError::Duration(_) => DiagnosticKind::InvalidDuration,
                    _ => DiagnosticKind::MalformedRecord,
                };
                warn!(file = rel, line = line_no, error = %err, "Skipping record: {line}");
                diagnostics.push(Diagnostic::new(
                    kind,
                    rel,
                    Some(line_no),
                    format!("{err}: {line}"),
                ));
                continue;
            }
        };

        if name.is_none() {
            if cooked.contains(&record.name, day) {
                info!(
                    file = rel,
                    workload = %record.name,
                    day,
                    "Skipping previously cooked data"
                );
                return ParsedFile {
                    outcome: FileOutcome::SkippedCooked { name: record.name },
                    diagnostics,
                };
            }
            name = Some(record.name.clone());
        } else if let Some(first) = name.as_deref().filter(|first| *first != record.name) {
            warn!(
                file = rel,
                line = line_no,
                expected = first,
                found = %record.name,
                "Benchmark name differs from previously seen name"
            );
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::NameMismatch,
                rel,
                Some(line_no),
                format!(
                    "benchmark name {:?} differs from previously seen name {first:?}",
                    record.name
                ),
            ));
        }

        samples.push(record.sample);
    }

    let outcome = match name {
        Some(name) => FileOutcome::Parsed { name, samples },
        None => FileOutcome::NoRecords,
    };
    ParsedFile {
        outcome,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    const DAY: &str = "20230101";
    const REL: &str = "20230101/pebble/write/values=1024/1/worker.log";

    fn line(name: &str, ops: &str, passed: bool) -> String {
        format!(
            "BenchmarkRaw{name} {ops} ops/sec {passed} pass 5s elapsed 1024 bytes 6 levels 1.50 writeAmp"
        )
    }

    fn parse(text: &str, cooked: &CookedSet) -> ParsedFile {
        parse_reader(Cursor::new(text.to_string()), REL, DAY, cooked)
    }

    #[test]
    fn test_classify_path() {
        let path = PathBuf::from(REL);
        let data = classify_path(&path).expect("data path");
        assert_eq!(data.day, DAY);
        assert_eq!(data.rel, REL);
    }

    #[test]
    fn test_classify_path_rejects_short_and_non_write() {
        assert!(classify_path(Path::new("20230101/pebble/write/values=1024/f.log")).is_none());
        assert!(classify_path(Path::new("20230101/pebble/ycsb/values=1024/1/f.log")).is_none());
        assert!(classify_path(Path::new("20230101/pebble/write/values=1024/1/deep/f.log")).is_some());
    }

    #[test]
    fn test_malformed_line_tolerated() {
        let text = format!(
            "noise\n{}\n{}\n",
            line("values=1024", "1000", true),
            line("values=1024", "abc", true)
        );
        let parsed = parse(&text, &CookedSet::default());

        let FileOutcome::Parsed { name, samples } = parsed.outcome else {
            panic!("expected parsed outcome");
        };
        assert_eq!(name, "values=1024");
        assert_eq!(samples.len(), 1);
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::MalformedRecord);
        assert_eq!(parsed.diagnostics[0].line, Some(3));
    }

    #[test]
    fn test_invalid_duration_kind() {
        let text = line("w", "1", true).replace(" 5s ", " five ");
        let parsed = parse(&text, &CookedSet::default());
        assert_eq!(parsed.outcome, FileOutcome::NoRecords);
        assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::InvalidDuration);
    }

    #[test]
    fn test_name_mismatch_reported_and_kept() {
        let text = format!("{}\n{}\n", line("a", "1", true), line("b", "2", true));
        let parsed = parse(&text, &CookedSet::default());

        let FileOutcome::Parsed { name, samples } = parsed.outcome else {
            panic!("expected parsed outcome");
        };
        assert_eq!(name, "a");
        assert_eq!(samples.len(), 2);
        assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::NameMismatch);
    }

    #[test]
    fn test_cooked_file_skipped() {
        let mut cooked = CookedSet::default();
        cooked.insert("values=1024", DAY);
        let text = format!("{}\n", line("values=1024", "1", true));
        let parsed = parse(&text, &cooked);
        assert_eq!(
            parsed.outcome,
            FileOutcome::SkippedCooked {
                name: "values=1024".to_string()
            }
        );
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_no_records() {
        let parsed = parse("just\nlog noise\n", &CookedSet::default());
        assert_eq!(parsed.outcome, FileOutcome::NoRecords);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_utf8_line_is_noise() {
        let mut bytes = format!("{}\n", line("w", "7", true)).into_bytes();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(format!("{}\r\n", line("w", "8", true)).as_bytes());

        let parsed = parse_reader(Cursor::new(bytes), REL, DAY, &CookedSet::default());
        let FileOutcome::Parsed { samples, .. } = parsed.outcome else {
            panic!("expected parsed outcome");
        };
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].ops_per_sec, 8);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_utf8_in_tagged_line_reported() {
        let mut bytes = b"BenchmarkRaww \xff ops/sec".to_vec();
        bytes.push(b'\n');
        bytes.extend_from_slice(format!("{}\n", line("w", "8", true)).as_bytes());

        let parsed = parse_reader(Cursor::new(bytes), REL, DAY, &CookedSet::default());
        let FileOutcome::Parsed { samples, .. } = parsed.outcome else {
            panic!("expected parsed outcome");
        };
        assert_eq!(samples.len(), 1);
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::MalformedRecord);
        assert_eq!(parsed.diagnostics[0].line, Some(1));
    }

    #[test]
    fn test_read_error_keeps_earlier_samples() {
        struct FailAfter(Cursor<Vec<u8>>);
        impl Read for FailAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                match self.0.read(buf)? {
                    0 => Err(io::Error::other("disk gone")),
                    n => Ok(n),
                }
            }
        }

        let text = format!("{}\n", line("w", "7", true)).into_bytes();
        let reader = BufReader::new(FailAfter(Cursor::new(text)));
        let parsed = parse_reader(reader, REL, DAY, &CookedSet::default());
        let FileOutcome::Parsed { samples, .. } = parsed.outcome else {
            panic!("expected parsed outcome");
        };
        assert_eq!(samples.len(), 1);
        assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::UnreadableFile);
        assert_eq!(parsed.diagnostics[0].line, Some(2));
    }

    #[test]
    fn test_diagnostic_summary() {
        let d = Diagnostic::new(DiagnosticKind::MalformedRecord, "a/b", Some(4), "bad");
        assert_eq!(d.summary(), "a/b:4: bad");
        let d = Diagnostic::new(DiagnosticKind::UnreadableFile, "a/b", None, "gone");
        assert_eq!(d.summary(), "a/b: gone");
    }
}
