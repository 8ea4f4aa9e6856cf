use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;

#[derive(Debug)]
pub struct MkbenchRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

impl MkbenchRun {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
    }

    /// The structured error printed after any log lines on stderr.
    pub fn stderr_json(&self) -> serde_json::Value {
        let lines: Vec<&str> = self.stderr.lines().collect();
        let start = lines
            .iter()
            .rposition(|line| *line == "{")
            .unwrap_or_else(|| panic!("no JSON object on stderr:\n{}", self.stderr));
        let payload = lines[start..].join("\n");
        serde_json::from_str(&payload)
            .unwrap_or_else(|e| panic!("stderr is not JSON ({e}):\n{}", self.stderr))
    }
}

/// Temporary working directory laid out like a benchmark host:
/// `data/` holds raw logs and `write-throughput/` receives summaries.
pub struct MkbenchWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub summary_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl MkbenchWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let data_dir = root.join("data");
        let summary_dir = root.join("write-throughput");
        let log_dir = root.join("logs");
        fs::create_dir_all(&data_dir).expect("data dir");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            temp_dir,
            root,
            data_dir,
            summary_dir,
            log_dir,
        }
    }

    pub fn summary_file(&self) -> PathBuf {
        self.summary_dir.join("summary.json")
    }

    pub fn read_summary(&self) -> serde_json::Value {
        let bytes = fs::read(self.summary_file()).expect("read summary");
        serde_json::from_slice(&bytes).expect("summary json")
    }

    /// Every file in the summary directory, sorted, with contents.
    pub fn snapshot_outputs(&self) -> Vec<(String, Vec<u8>)> {
        snapshot_dir(&self.summary_dir)
    }
}

fn snapshot_dir(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            let entry = entry.expect("entry");
            (
                entry.file_name().to_string_lossy().into_owned(),
                fs::read(entry.path()).expect("read file"),
            )
        })
        .collect();
    files.sort();
    files
}

pub fn run_mkbench<I, S>(workspace: &MkbenchWorkspace, args: I, label: &str) -> MkbenchRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_mkbench_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_mkbench_with_env<I, S, E, K, V>(
    workspace: &MkbenchWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> MkbenchRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mkbench"));
    cmd.current_dir(&workspace.root);
    cmd.args(args);
    cmd.env_remove("MKBENCH_DATA_DIR");
    cmd.env_remove("MKBENCH_SUMMARY_DIR");
    cmd.env_remove("MKBENCH_LOCK");
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "mkbench=debug");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.envs(env_vars);

    let start = Instant::now();
    let output = cmd.output().expect("run mkbench");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let log_body = format!(
        "label: {label}\nstarted: {:?}\nduration: {:?}\nstatus: {}\nargs: {:?}\ncwd: {}\n\nstdout:\n{}\n\nstderr:\n{}\n",
        SystemTime::now(),
        duration,
        output.status,
        cmd.get_args().collect::<Vec<_>>(),
        workspace.root.display(),
        stdout,
        stderr
    );
    fs::write(&log_path, log_body).expect("write log");

    MkbenchRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}
