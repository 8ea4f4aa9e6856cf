//! E2E tests for the `completions` and `version` commands.

mod common;

use common::cli::{MkbenchWorkspace, run_mkbench};

#[test]
fn e2e_completions_every_shell() {
    let _log = common::test_log("e2e_completions_every_shell");
    let workspace = MkbenchWorkspace::new();

    for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
        let run = run_mkbench(&workspace, ["completions", shell], shell);
        assert!(run.status.success(), "{shell} failed: {}", run.stderr);
        assert!(run.stdout.contains("mkbench"), "{shell} script lacks bin name");
        assert!(run.stdout.contains("write"), "{shell} script lacks write");
    }
}

#[test]
fn e2e_completions_to_file() {
    let _log = common::test_log("e2e_completions_to_file");
    let workspace = MkbenchWorkspace::new();
    let target = workspace.root.join("_mkbench");

    let run = run_mkbench(
        &workspace,
        ["completions", "zsh", "-o", target.to_str().expect("utf8 path")],
        "zsh_file",
    );
    assert!(run.status.success(), "stderr: {}", run.stderr);
    assert!(run.stdout.is_empty());
    let script = std::fs::read_to_string(&target).expect("script");
    assert!(script.contains("--summary-dir"));
}

#[test]
fn e2e_completions_unknown_shell() {
    let _log = common::test_log("e2e_completions_unknown_shell");
    let workspace = MkbenchWorkspace::new();
    let run = run_mkbench(&workspace, ["completions", "tcsh"], "unknown_shell");
    assert!(!run.status.success());
}

#[test]
fn e2e_version() {
    let _log = common::test_log("e2e_version");
    let workspace = MkbenchWorkspace::new();

    let text = run_mkbench(&workspace, ["version"], "version");
    assert!(text.status.success());
    assert!(text.stdout.starts_with(&format!("mkbench version {}", env!("CARGO_PKG_VERSION"))));

    let json = run_mkbench(&workspace, ["version", "--json"], "version_json");
    assert!(json.status.success());
    assert_eq!(json.json()["version"], env!("CARGO_PKG_VERSION"));
}
