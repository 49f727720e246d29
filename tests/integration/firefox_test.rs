//! Integration tests for the firefox command

use std::fs;

use predicates::prelude::*;

use crate::helpers::Sandbox;

fn dump(sandbox: &Sandbox, extra: &[&str]) -> String {
    let out = sandbox
        .cmd()
        .arg("firefox")
        .arg("--sessions-dir")
        .arg(sandbox.sessions())
        .arg("--dumps-dir")
        .arg(sandbox.out())
        .arg("dump")
        .args(extra)
        .args(["-o", "dump.out"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("dump.out"));
    fs::read_to_string(sandbox.out().join("dump.out")).unwrap()
}

// ============================================================================
// Dump
// ============================================================================

#[test]
fn dump_outline_keeps_first_page_per_tab() {
    let sandbox = Sandbox::new();
    sandbox.install_firefox_recovery();

    let text = dump(&sandbox, &[]);
    insta::assert_snapshot!(text.trim_end(), @r"
    * window 1
    ** [[https://www.rust-lang.org/][Rust Programming Language]]
    ** [[https://crates.io/][crates.io: Rust Package Registry]]
    * window 2
    ** [[https://orgmode.org/]]
    ");
}

#[test]
fn dump_with_history_nests_later_pages() {
    let sandbox = Sandbox::new();
    sandbox.install_firefox_recovery();

    let text = dump(&sandbox, &["--keep-tabs-history"]);
    insta::assert_snapshot!(text.trim_end(), @r"
    * window 1
    ** [[https://www.rust-lang.org/][Rust Programming Language]]
    *** [[https://doc.rust-lang.org/book/][The Rust Programming Language]]
    ** [[https://crates.io/][crates.io: Rust Package Registry]]
    * window 2
    ** [[https://orgmode.org/]]
    ");
}

#[test]
fn dump_flat_raw_lists_bare_urls() {
    let sandbox = Sandbox::new();
    sandbox.install_firefox_recovery();

    let text = dump(&sandbox, &["--flat", "--raw"]);
    assert_eq!(
        text,
        "* https://www.rust-lang.org/\n* https://crates.io/\n* https://orgmode.org/\n"
    );
}

#[test]
fn dump_json_is_parseable() {
    let sandbox = Sandbox::new();
    sandbox.install_firefox_recovery();

    let text = dump(&sandbox, &["--json"]);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let windows = value["windows"].as_array().unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0]["selected"], 2);
    assert_eq!(windows[1]["tabs"][0]["entries"][0]["originalURI"], "http://orgmode.org/");
}

#[test]
fn dump_generates_timestamped_name() {
    let sandbox = Sandbox::new();
    sandbox.install_firefox_recovery();

    sandbox
        .cmd()
        .arg("firefox")
        .arg("--sessions-dir")
        .arg(sandbox.sessions())
        .arg("--dumps-dir")
        .arg(sandbox.out())
        .args(["dump", "--dump-basename", "work tabs"])
        .assert()
        .success();

    let names = sandbox.names(&sandbox.out());
    assert_eq!(names.len(), 1);
    let re = regex::Regex::new(r"^work-tabs-\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2}\.org$").unwrap();
    assert!(re.is_match(&names[0]), "unexpected name {}", names[0]);
}

#[test]
fn dump_falls_back_to_previous() {
    let sandbox = Sandbox::new();
    sandbox.install_firefox_recovery();
    fs::rename(
        sandbox.sessions().join("recovery.jsonlz4"),
        sandbox.sessions().join("previous.jsonlz4"),
    )
    .unwrap();

    let text = dump(&sandbox, &["--flat"]);
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn dump_rejects_uncompressed_file() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.sessions().join("recovery.jsonlz4"), b"{\"windows\": []}").unwrap();

    sandbox
        .cmd()
        .arg("firefox")
        .arg("--sessions-dir")
        .arg(sandbox.sessions())
        .arg("--dumps-dir")
        .arg(sandbox.out())
        .arg("dump")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("recovery.jsonlz4"))
        .stderr(predicate::str::contains("wrong header"));

    assert!(sandbox.names(&sandbox.out()).is_empty());
}

#[test]
fn dump_without_any_backup_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("firefox")
        .arg("--sessions-dir")
        .arg(sandbox.sessions())
        .arg("--dumps-dir")
        .arg(sandbox.out())
        .arg("dump")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("previous.jsonlz4"));
}

// ============================================================================
// List, Remove, Rotate
// ============================================================================

#[test]
fn list_shows_dumps_only() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.out().join("firefox-session-auto-2024-01-31-08-15-00.org"), "* x\n").unwrap();
    fs::write(sandbox.out().join("notes.txt"), "x").unwrap();

    sandbox
        .cmd()
        .arg("firefox")
        .arg("--dumps-dir")
        .arg(sandbox.out())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("firefox-session-auto-2024-01-31-08-15-00.org"))
        .stdout(predicate::str::contains("2024-01-31 08:15"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[cfg(unix)]
#[test]
fn remove_deletes_picked_dump() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.out().join("a.org"), "* a\n").unwrap();
    fs::write(sandbox.out().join("b.org"), "* b\n").unwrap();
    sandbox.install_fake_dmenu("b.org");

    sandbox
        .cmd()
        .arg("firefox")
        .arg("--dumps-dir")
        .arg(sandbox.out())
        .arg("remove")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    assert_eq!(sandbox.names(&sandbox.out()), vec!["a.org"]);
    assert_eq!(sandbox.dmenu_input(), "a.org\nb.org");
}

#[cfg(unix)]
#[test]
fn remove_cancelled_keeps_everything() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.out().join("a.org"), "* a\n").unwrap();
    sandbox.install_fake_dmenu("");

    sandbox
        .cmd()
        .arg("firefox")
        .arg("--dumps-dir")
        .arg(sandbox.out())
        .arg("remove")
        .assert()
        .success();

    assert_eq!(sandbox.names(&sandbox.out()), vec!["a.org"]);
}

#[test]
fn rotate_dry_run_keeps_recent_dumps() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.out().join("a.org"), "* a\n").unwrap();

    sandbox
        .cmd()
        .arg("firefox")
        .arg("--dumps-dir")
        .arg(sandbox.out())
        .args(["rotate", "-k", "60", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(sandbox.names(&sandbox.out()), vec!["a.org"]);
}
