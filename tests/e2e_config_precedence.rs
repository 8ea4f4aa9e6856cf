//! E2E tests for configuration precedence:
//! CLI flags > `MKBENCH_*` environment > `.mkbench.yaml` > defaults.

mod common;

use common::cli::{MkbenchWorkspace, run_mkbench, run_mkbench_with_env};
use common::fixtures::{worker_log, worker_path, write_plain};
use std::fs;
use std::path::Path;

fn seed(root: &Path) {
    write_plain(
        root,
        &worker_path("20230101", "values=64", "1", "a.log"),
        &worker_log("values=64", &[10], &[], 1.0),
    );
}

fn wrote_summary(dir: &Path) -> bool {
    dir.join("summary.json").is_file()
}

#[test]
fn e2e_defaults() {
    let _log = common::test_log("e2e_defaults");
    let workspace = MkbenchWorkspace::new();
    seed(&workspace.data_dir);

    let run = run_mkbench(&workspace, ["write"], "defaults");
    assert!(run.status.success(), "stderr: {}", run.stderr);
    assert!(wrote_summary(&workspace.root.join("write-throughput")));
}

#[test]
fn e2e_yaml_then_env_then_cli() {
    let _log = common::test_log("e2e_yaml_then_env_then_cli");
    let workspace = MkbenchWorkspace::new();
    for dir in ["raw-yaml", "raw-env", "raw-cli"] {
        seed(&workspace.root.join(dir));
    }
    fs::write(
        workspace.root.join(".mkbench.yaml"),
        "data-dir: raw-yaml\nsummary-dir: out-yaml\n",
    )
    .expect("config");

    let yaml = run_mkbench(&workspace, ["write", "--json"], "yaml");
    assert!(yaml.status.success(), "stderr: {}", yaml.stderr);
    assert_eq!(yaml.json()["data_dir"], "raw-yaml");
    assert!(wrote_summary(&workspace.root.join("out-yaml")));

    let env = run_mkbench_with_env(
        &workspace,
        ["write", "--json"],
        [("MKBENCH_DATA_DIR", "raw-env"), ("MKBENCH_SUMMARY_DIR", "out-env")],
        "env",
    );
    assert!(env.status.success(), "stderr: {}", env.stderr);
    assert_eq!(env.json()["data_dir"], "raw-env");
    assert!(wrote_summary(&workspace.root.join("out-env")));

    let cli = run_mkbench_with_env(
        &workspace,
        ["write", "--json", "--data-dir", "raw-cli", "--summary-dir", "out-cli"],
        [("MKBENCH_DATA_DIR", "raw-env"), ("MKBENCH_SUMMARY_DIR", "out-env")],
        "cli",
    );
    assert!(cli.status.success(), "stderr: {}", cli.stderr);
    assert_eq!(cli.json()["data_dir"], "raw-cli");
    assert_eq!(cli.json()["summary_dir"], "out-cli");
}

#[test]
fn e2e_explicit_config_file() {
    let _log = common::test_log("e2e_explicit_config_file");
    let workspace = MkbenchWorkspace::new();
    seed(&workspace.root.join("elsewhere"));
    fs::write(
        workspace.root.join("bench.yaml"),
        "data_dir: elsewhere\nsummary_dir: out\n",
    )
    .expect("config");

    let run = run_mkbench(&workspace, ["write", "--config", "bench.yaml"], "explicit");
    assert!(run.status.success(), "stderr: {}", run.stderr);
    assert!(wrote_summary(&workspace.root.join("out")));

    let missing = run_mkbench(&workspace, ["write", "--json", "--config", "absent.yaml"], "absent");
    assert_eq!(missing.status.code(), Some(7));
}
