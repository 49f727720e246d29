//! Library-level tests of the load, fix and render pipeline on fixtures

use std::fs;

use tempfile::TempDir;

use tabstash::session::{
    self, container, Format, Layout, RenderOptions, Selection, SessionError,
};

use crate::helpers::{fixtures_dir, load_fixture};

fn outline(layout: Layout, selection: Selection) -> RenderOptions {
    RenderOptions::new(layout, selection)
}

#[test]
fn firefox_fixture_survives_container_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recovery.jsonlz4");
    let plain = load_fixture("firefox_session.json");

    container::write(&path, plain.as_bytes()).unwrap();
    assert_eq!(container::read(&path).unwrap(), plain.as_bytes());

    let tree = Format::Firefox.load(&path).unwrap();
    assert_eq!(tree.windows.len(), 2);
    assert_eq!(tree.tab_count(), 3);
    assert!(tree.windows[0].tabs[1].active);
}

#[test]
fn firefox_native_reencode_is_stable() {
    let plain = load_fixture("firefox_session.json");
    let tree = Format::Firefox.decode(plain.as_bytes()).unwrap();

    let once = Format::Firefox.encode(&tree).unwrap();
    let again = Format::Firefox
        .encode(&Format::Firefox.decode(&once).unwrap())
        .unwrap();
    assert_eq!(once, again);
}

#[test]
fn qutebrowser_native_roundtrip_keeps_tree() {
    let tree = Format::Qutebrowser
        .load(fixtures_dir().join("qutebrowser_session.yml"))
        .unwrap();
    let bytes = Format::Qutebrowser.encode(&tree).unwrap();
    assert_eq!(Format::Qutebrowser.decode(&bytes).unwrap(), tree);

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("geometry: !!binary |"), "got {text}");
}

#[test]
fn flat_and_nested_outlines_differ_by_window_headings() {
    let plain = load_fixture("firefox_session.json");
    let tree = Format::Firefox.decode(plain.as_bytes()).unwrap();
    let selection = Selection::History { with_history: true };

    let nested = session::render(&tree, Format::Firefox, &outline(Layout::Outline, selection)).unwrap();
    let flat = session::render(&tree, Format::Firefox, &outline(Layout::Flat, selection)).unwrap();

    let count = |b: &[u8]| String::from_utf8_lossy(b).lines().count();
    assert_eq!(count(&nested), count(&flat) + tree.windows.len());
}

#[test]
fn fix_is_idempotent_on_fixture() {
    let tree = Format::Qutebrowser
        .load(fixtures_dir().join("qutebrowser_session.yml"))
        .unwrap();
    let once = session::fix(tree);
    let twice = session::fix(once.clone());
    assert_eq!(once, twice);
    assert_eq!(once.entry_count(), 3);
}

#[test]
fn dump_refuses_missing_session_without_touching_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.org");

    let err = session::dump(
        &path,
        None,
        Format::Firefox,
        &outline(Layout::Outline, Selection::ActiveOnly),
    )
    .unwrap_err();

    assert!(matches!(err, SessionError::EmptySession));
    assert!(!path.exists());
}

#[test]
fn dump_truncates_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.org");
    fs::write(&path, "stale content that is longer than the dump\n".repeat(20)).unwrap();

    let tree = Format::Qutebrowser
        .load(fixtures_dir().join("qutebrowser_session.yml"))
        .unwrap();
    session::dump(
        &path,
        Some(&tree),
        Format::Qutebrowser,
        &outline(Layout::Flat, Selection::ActiveOnly).raw_urls(true),
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "* https://orgmode.org/manual/\n* https://unreachable.example/\n"
    );
}
