//! Raw benchmark log fixtures.

use bzip2::Compression as BzCompression;
use bzip2::write::BzEncoder;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One sample line as a worker emits it.
pub fn record_line(name: &str, ops: i64, passed: bool, elapsed: &str, write_amp: f64) -> String {
    format!(
        "BenchmarkRaw{name} {ops} ops/sec {passed} pass {elapsed} elapsed 1024 bytes 6 levels {write_amp:.2} writeAmp"
    )
}

/// A worker log: passing samples followed by failing ones, with noise.
pub fn worker_log(name: &str, passing: &[i64], failing: &[i64], write_amp: f64) -> String {
    let mut out = String::from("starting benchmark\n");
    let mut elapsed = 0;
    for (ops, passed) in passing
        .iter()
        .map(|ops| (*ops, true))
        .chain(failing.iter().map(|ops| (*ops, false)))
    {
        elapsed += 5;
        out.push_str(&record_line(name, ops, passed, &format!("{elapsed}s"), write_amp));
        out.push('\n');
    }
    out.push_str("done\n");
    out
}

/// Relative path of a worker file under the data root.
pub fn worker_path(day: &str, workload: &str, run: &str, file: &str) -> String {
    format!("{day}/pebble/write/{workload}/{run}/{file}")
}

fn prepare(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    path
}

pub fn write_plain(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = prepare(root, rel);
    fs::write(&path, contents).expect("write plain");
    path
}

pub fn write_gzip(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = prepare(root, rel);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(contents.as_bytes()).expect("gzip");
    fs::write(&path, encoder.finish().expect("gzip finish")).expect("write gzip");
    path
}

pub fn write_bzip2(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = prepare(root, rel);
    let mut encoder = BzEncoder::new(Vec::new(), BzCompression::default());
    encoder.write_all(contents.as_bytes()).expect("bzip2");
    fs::write(&path, encoder.finish().expect("bzip2 finish")).expect("write bzip2");
    path
}
