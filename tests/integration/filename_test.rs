//! Tests for dump name sanitization, generation and timestamp recovery.

use chrono::{NaiveDate, NaiveDateTime};

use tabstash::files::filename::{
    self, timestamp_from_name, Config, FilenameError, GenerateError, Segment, Template,
    TemplateError, DEFAULT_TEMPLATE,
};

fn moment(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 31)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

// ============================================================================
// Sanitization Tests
// ============================================================================

#[test]
fn sanitize_replaces_whitespace_with_hyphens() {
    assert_eq!(filename::sanitize("work \t tabs"), "work-tabs");
}

#[test]
fn sanitize_removes_invalid_chars() {
    assert_eq!(filename::sanitize("a/b\\c:d*e?f\"g<h>i|j"), "abcdefghij");
}

#[test]
fn sanitize_transliterates_unicode() {
    assert_eq!(filename::sanitize("Café Über"), "Cafe-Uber");
}

#[test]
fn sanitize_trims_edges() {
    assert_eq!(filename::sanitize("  ..-tabs-.. "), "tabs");
}

#[test]
fn sanitize_falls_back_for_empty_result() {
    assert_eq!(filename::sanitize(""), "session");
    assert_eq!(filename::sanitize("///"), "session");
    assert_eq!(filename::sanitize("..."), "session");
}

#[test]
fn sanitize_preserves_safe_chars() {
    assert_eq!(filename::sanitize("firefox_session.auto-1"), "firefox_session.auto-1");
}

#[test]
fn sanitize_basename_truncates() {
    let config = Config::new(5);
    assert_eq!(filename::sanitize_basename("firefox-session", &config), "firef");
}

#[test]
fn config_new_enforces_minimum_length() {
    assert_eq!(Config::new(0).basename_max_length, 1);
}

// ============================================================================
// Length Validation Tests
// ============================================================================

#[test]
fn validate_length_accepts_255_chars() {
    assert!(filename::validate_length(&"a".repeat(255)).is_ok());
}

#[test]
fn validate_length_rejects_256_chars() {
    assert_eq!(
        filename::validate_length(&"a".repeat(256)),
        Err(FilenameError::TooLong {
            length: 256,
            max: 255
        })
    );
}

// ============================================================================
// Template Parsing Tests
// ============================================================================

#[test]
fn template_parse_default() {
    let template = Template::parse(DEFAULT_TEMPLATE).unwrap();
    assert_eq!(
        template.segments(),
        &[
            Segment::Basename,
            Segment::Literal("-".to_string()),
            Segment::Date("%Y-%m-%d".to_string()),
            Segment::Literal("-".to_string()),
            Segment::Time("%H-%M-%S".to_string()),
        ]
    );
}

#[test]
fn template_parse_custom_formats() {
    let template = Template::parse("{date:%Y%m%d}_{time:%H%M}").unwrap();
    assert_eq!(
        template.segments(),
        &[
            Segment::Date("%Y%m%d".to_string()),
            Segment::Literal("_".to_string()),
            Segment::Time("%H%M".to_string()),
        ]
    );
}

#[test]
fn template_parse_errors() {
    assert_eq!(Template::parse("").unwrap_err(), TemplateError::Empty);
    assert_eq!(
        Template::parse("{basename").unwrap_err(),
        TemplateError::UnclosedBrace
    );
    assert_eq!(
        Template::parse("basename}").unwrap_err(),
        TemplateError::UnmatchedCloseBrace
    );
    assert_eq!(
        Template::parse("{window}").unwrap_err(),
        TemplateError::UnknownTag("window".to_string())
    );
    assert!(matches!(
        Template::parse("{date:plain}").unwrap_err(),
        TemplateError::InvalidFormat(_)
    ));
    assert!(matches!(
        Template::parse("{basename:%Y}").unwrap_err(),
        TemplateError::InvalidFormat(_)
    ));
}

// ============================================================================
// Generation Tests
// ============================================================================

#[test]
fn generate_default_template() {
    let name = filename::generate(
        "firefox-session-auto",
        DEFAULT_TEMPLATE,
        "org",
        &Config::default(),
        moment(8, 15, 0),
    )
    .unwrap();
    assert_eq!(name, "firefox-session-auto-2024-01-31-08-15-00.org");
}

#[test]
fn generate_does_not_duplicate_extension() {
    let name = filename::generate(
        "x",
        "{basename}.json",
        "json",
        &Config::default(),
        moment(0, 0, 0),
    )
    .unwrap();
    assert_eq!(name, "x.json");
}

#[test]
fn generate_reports_template_errors() {
    let err = filename::generate("x", "{nope}", "org", &Config::default(), moment(0, 0, 0))
        .unwrap_err();
    assert!(matches!(err, GenerateError::Template(TemplateError::UnknownTag(_))));
}

#[test]
fn generate_rejects_overlong_names() {
    let err = filename::generate(
        "x",
        &"{date}".repeat(30),
        "org",
        &Config::default(),
        moment(0, 0, 0),
    )
    .unwrap_err();
    assert!(matches!(err, GenerateError::Filename(FilenameError::TooLong { .. })));
}

// ============================================================================
// Timestamp Recovery Tests
// ============================================================================

#[test]
fn timestamp_from_qutebrowser_session_name() {
    assert_eq!(
        timestamp_from_name("session-2024-01-31-08-15-00.yml"),
        Some(moment(8, 15, 0))
    );
}

#[test]
fn timestamp_from_generated_dump_name() {
    let name = filename::generate(
        "firefox-session-auto",
        DEFAULT_TEMPLATE,
        "org",
        &Config::default(),
        moment(23, 59, 58),
    )
    .unwrap();
    assert_eq!(timestamp_from_name(&name), Some(moment(23, 59, 58)));
}

#[test]
fn timestamp_from_compact_name() {
    assert_eq!(
        timestamp_from_name("dump-20240131-081500.org"),
        Some(moment(8, 15, 0))
    );
}

#[test]
fn timestamp_from_date_only_name() {
    assert_eq!(timestamp_from_name("tabs-2024-01-31.org"), Some(moment(0, 0, 0)));
}

#[test]
fn timestamp_absent_or_invalid() {
    assert_eq!(timestamp_from_name("default.yml"), None);
    assert_eq!(timestamp_from_name("session-2024-13-45.yml"), None);
}
