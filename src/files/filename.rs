//! Dump filename generation, sanitization and timestamp recovery.
//!
//! Provides configurable filename templates with tags like `{basename}`, `{date}`, `{time}`,
//! sanitization to keep names filesystem-safe, and the reverse direction: pulling the
//! timestamp back out of a name produced by tabstash or by qutebrowser.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use deunicode::deunicode;
use regex::Regex;

/// Minimum allowed value for basename_max_length.
const MIN_BASENAME_MAX_LENGTH: usize = 1;

/// Configuration for filename generation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum length for the basename component (default: 50, minimum: 1).
    pub basename_max_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            basename_max_length: 50,
        }
    }
}

impl Config {
    /// Creates a new Config, ensuring basename_max_length is at least 1.
    pub fn new(basename_max_length: usize) -> Self {
        Self {
            basename_max_length: basename_max_length.max(MIN_BASENAME_MAX_LENGTH),
        }
    }
}

/// Characters that are invalid in filenames on common filesystems.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Default fallback name when sanitization produces an empty result.
const FALLBACK_NAME: &str = "session";

/// Maximum filename length for most filesystems.
const MAX_FILENAME_LENGTH: usize = 255;

/// Sanitizes a string for use in filenames.
///
/// Applies the following transformations in order:
/// 1. Unicode → ASCII transliteration
/// 2. Whitespace → hyphens
/// 3. Invalid filesystem characters removed
/// 4. Multiple hyphens collapsed to single
/// 5. Leading/trailing dots, spaces, hyphens trimmed
/// 6. Empty results → "session" fallback
pub fn sanitize(input: &str) -> String {
    let ascii = deunicode(input);

    let mut result = String::with_capacity(ascii.len());
    let mut last_was_hyphen = false;

    for c in ascii.chars() {
        if c.is_whitespace() || c == '-' {
            if !last_was_hyphen {
                result.push('-');
                last_was_hyphen = true;
            }
        } else if INVALID_CHARS.contains(&c) {
            continue;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            result.push(c);
            last_was_hyphen = false;
        }
        // Anything else that survived deunicode is dropped
    }

    let trimmed = trim_edges(&result);
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed
    }
}

/// Sanitizes a basename with length truncation.
pub fn sanitize_basename(input: &str, config: &Config) -> String {
    let sanitized = sanitize(input);
    truncate_to_length(&sanitized, config.basename_max_length)
}

/// Validates that a final filename doesn't exceed filesystem limits.
pub fn validate_length(filename: &str) -> Result<(), FilenameError> {
    if filename.len() > MAX_FILENAME_LENGTH {
        Err(FilenameError::TooLong {
            length: filename.len(),
            max: MAX_FILENAME_LENGTH,
        })
    } else {
        Ok(())
    }
}

/// Generates a dump filename from a template.
///
/// Parses the template, renders it with the basename and `now`, appends
/// `.{extension}` unless already present, and validates the final length.
pub fn generate(
    basename: &str,
    template: &str,
    extension: &str,
    config: &Config,
    now: NaiveDateTime,
) -> Result<String, GenerateError> {
    let parsed = Template::parse(template)?;
    let rendered = parsed.render(basename, config, now);

    let suffix = format!(".{}", extension);
    let filename = if extension.is_empty() || rendered.ends_with(&suffix) {
        rendered
    } else {
        format!("{}{}", rendered, suffix)
    };

    validate_length(&filename)?;

    Ok(filename)
}

/// Errors that can occur during filename generation.
#[derive(Debug)]
pub enum GenerateError {
    /// Template parsing error.
    Template(TemplateError),
    /// Filename validation error.
    Filename(FilenameError),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Template(e) => write!(f, "Template error: {}", e),
            GenerateError::Filename(e) => write!(f, "Filename error: {}", e),
        }
    }
}

impl std::error::Error for GenerateError {}

impl From<TemplateError> for GenerateError {
    fn from(e: TemplateError) -> Self {
        GenerateError::Template(e)
    }
}

impl From<FilenameError> for GenerateError {
    fn from(e: FilenameError) -> Self {
        GenerateError::Filename(e)
    }
}

/// Trims leading and trailing dots, spaces, and hyphens.
fn trim_edges(s: &str) -> String {
    s.trim_matches(|c| c == '.' || c == ' ' || c == '-')
        .to_string()
}

/// Truncates a string to the specified length.
fn truncate_to_length(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Errors that can occur during filename operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename exceeds 255 character filesystem limit.
    TooLong { length: usize, max: usize },
}

impl std::fmt::Display for FilenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilenameError::TooLong { length, max } => {
                write!(f, "Filename too long: {} characters (max {})", length, max)
            }
        }
    }
}

impl std::error::Error for FilenameError {}

/// Errors that can occur during template parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Template string is empty.
    Empty,
    /// Unclosed brace in template.
    UnclosedBrace,
    /// Unmatched closing brace in template.
    UnmatchedCloseBrace,
    /// Unknown tag name.
    UnknownTag(String),
    /// Invalid format string.
    InvalidFormat(String),
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::Empty => write!(f, "Template cannot be empty"),
            TemplateError::UnclosedBrace => write!(f, "Unclosed brace in template"),
            TemplateError::UnmatchedCloseBrace => write!(f, "Unmatched closing brace in template"),
            TemplateError::UnknownTag(tag) => write!(f, "Unknown template tag: {}", tag),
            TemplateError::InvalidFormat(fmt) => write!(f, "Invalid format string: {}", fmt),
        }
    }
}

impl std::error::Error for TemplateError {}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text to include as-is.
    Literal(String),
    /// Dump basename tag.
    Basename,
    /// Date tag with format string.
    Date(String),
    /// Time tag with format string.
    Time(String),
}

/// Default date format for {date} tag.
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default time format for {time} tag.
const DEFAULT_TIME_FORMAT: &str = "%H-%M-%S";

/// Default template string.
pub const DEFAULT_TEMPLATE: &str = "{basename}-{date}-{time}";

/// A parsed filename template.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses a template string into segments.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        if template.is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut chars = template.chars().peekable();
        let mut literal = String::new();

        while let Some(c) = chars.next() {
            if c == '{' {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }

                let mut tag_content = String::new();
                let mut found_close = false;

                for tc in chars.by_ref() {
                    if tc == '}' {
                        found_close = true;
                        break;
                    }
                    if tc == '{' {
                        return Err(TemplateError::UnclosedBrace);
                    }
                    tag_content.push(tc);
                }

                if !found_close {
                    return Err(TemplateError::UnclosedBrace);
                }

                segments.push(parse_tag(&tag_content)?);
            } else if c == '}' {
                return Err(TemplateError::UnmatchedCloseBrace);
            } else {
                literal.push(c);
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Renders the template with the given basename and moment.
    pub fn render(&self, basename: &str, config: &Config, now: NaiveDateTime) -> String {
        let mut result = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => result.push_str(s),
                Segment::Basename => result.push_str(&sanitize_basename(basename, config)),
                Segment::Date(fmt) | Segment::Time(fmt) => {
                    result.push_str(&now.format(fmt).to_string())
                }
            }
        }

        result
    }
}

/// Parses a tag content string (without braces) into a Segment.
fn parse_tag(content: &str) -> Result<Segment, TemplateError> {
    let (tag_name, format) = match content.split_once(':') {
        Some((name, fmt)) => (name, Some(fmt)),
        None => (content, None),
    };

    match tag_name {
        "basename" => {
            if format.is_some() {
                return Err(TemplateError::InvalidFormat(
                    "basename tag does not accept format".to_string(),
                ));
            }
            Ok(Segment::Basename)
        }
        "date" => {
            let fmt = checked_format(format.unwrap_or(DEFAULT_DATE_FORMAT), "date")?;
            Ok(Segment::Date(fmt))
        }
        "time" => {
            let fmt = checked_format(format.unwrap_or(DEFAULT_TIME_FORMAT), "time")?;
            Ok(Segment::Time(fmt))
        }
        _ => Err(TemplateError::UnknownTag(tag_name.to_string())),
    }
}

fn checked_format(fmt: &str, tag: &str) -> Result<String, TemplateError> {
    if fmt.is_empty() {
        return Err(TemplateError::InvalidFormat(format!(
            "{} format cannot be empty",
            tag
        )));
    }
    validate_strftime_format(fmt)?;
    Ok(fmt.to_string())
}

/// Validates a strftime format string by checking it contains at least one valid specifier.
fn validate_strftime_format(fmt: &str) -> Result<(), TemplateError> {
    const VALID_SPECIFIERS: &[char] = &[
        'Y', 'y', 'm', 'd', 'H', 'M', 'S', 'f', 'j', 'U', 'W', 'w', 'a', 'A', 'b', 'B', 'C', 'e',
        'G', 'g', 'I', 'k', 'l', 'n', 'P', 'p', 'r', 'R', 'T', 's', 't', 'u', 'V', 'z', 'Z', '+',
        '%',
    ];

    let mut found_specifier = false;
    let mut chars = fmt.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            if let Some(&next) = chars.peek() {
                if VALID_SPECIFIERS.contains(&next) {
                    found_specifier = true;
                    chars.next();
                }
            }
        }
    }

    if !found_specifier {
        return Err(TemplateError::InvalidFormat(format!(
            "format string '{}' contains no valid strftime specifiers",
            fmt
        )));
    }

    Ok(())
}

/// A way timestamps get embedded into session filenames.
struct NamePattern {
    regex: &'static str,
    format: &'static str,
    date_only: bool,
}

/// Tried in order, first match wins.
const NAME_PATTERNS: &[NamePattern] = &[
    // session-2024-01-31-08-15-00 (qutebrowser) and default dump names
    NamePattern {
        regex: r"(\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2})",
        format: "%Y-%m-%d-%H-%M-%S",
        date_only: false,
    },
    NamePattern {
        regex: r"(\d{8}-\d{6})",
        format: "%Y%m%d-%H%M%S",
        date_only: false,
    },
    NamePattern {
        regex: r"(\d{4}-\d{2}-\d{2})",
        format: "%Y-%m-%d",
        date_only: true,
    },
];

fn compiled_patterns() -> &'static [(Regex, &'static NamePattern)] {
    static COMPILED: OnceLock<Vec<(Regex, &'static NamePattern)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        NAME_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p.regex).ok().map(|re| (re, p)))
            .collect()
    })
}

/// Recovers the timestamp embedded in a session filename.
///
/// Returns `None` when no known pattern matches or the matched digits are
/// not a valid date.
pub fn timestamp_from_name(name: &str) -> Option<NaiveDateTime> {
    for (regex, pattern) in compiled_patterns() {
        let Some(found) = regex.captures(name).and_then(|c| c.get(1)) else {
            continue;
        };
        let text = found.as_str();
        let parsed = if pattern.date_only {
            NaiveDate::parse_from_str(text, pattern.format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        } else {
            NaiveDateTime::parse_from_str(text, pattern.format).ok()
        };
        if parsed.is_some() {
            return parsed;
        }
    }
    None
}
