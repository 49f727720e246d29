//! Integration tests for the CLI surface

use predicates::prelude::*;

use crate::helpers::Sandbox;

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn help_lists_browser_commands() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("firefox"))
        .stdout(predicate::str::contains("qutebrowser"))
        .stdout(predicate::str::contains("TABSTASH_LOG"));
}

#[test]
fn version_starts_with_package_version() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "tabstash {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn firefox_dump_help_shows_flags() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["firefox", "dump", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--keep-tabs-history"))
        .stdout(predicate::str::contains("--dump-basename"))
        .stdout(predicate::str::contains("--raw"));
}

// ============================================================================
// Usage Errors
// ============================================================================

#[test]
fn missing_subcommand_is_usage_error() {
    let sandbox = Sandbox::new();
    sandbox.cmd().arg("firefox").assert().code(2);
}

#[test]
fn json_and_flat_together_are_rejected() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["firefox", "dump", "--json", "--flat"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn rotate_without_keep_minutes_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["firefox", "--dumps-dir"])
        .arg(sandbox.out())
        .arg("rotate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--keep-minutes"));
}

#[test]
fn unknown_selector_tool_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["--selector-tool", "fzf", "qutebrowser", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown selector tool"));
}

// ============================================================================
// Config and Completions
// ============================================================================

#[test]
fn config_show_prints_defaults() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[selector]"))
        .stdout(predicate::str::contains("tool = \"dmenu\""))
        .stdout(predicate::str::contains("dump_basename = \"firefox-session-auto\""));
}

#[test]
fn config_show_reflects_file() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.path("config.toml"),
        "[selector]\ntool = \"bemenu\"\n",
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tool = \"bemenu\""));
}

#[test]
fn invalid_config_is_reported() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.path("config.toml"), "[selector\n").unwrap();

    sandbox
        .cmd()
        .args(["qutebrowser", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn completions_for_bash() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tabstash"));
}
