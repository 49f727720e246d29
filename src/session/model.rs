//! Browser-agnostic session tree.
//!
//! Both browser families decode into the same Windows → Tabs → History tree.
//! Fields that only one family records (scroll position, zoom, the
//! Firefox `originalURI`, ...) are carried along so a native dump writes
//! back what was read, but the outline renderers never look at them.

use serde::{Deserialize, Serialize};

/// Prefix of titles qutebrowser gives to pages that failed to load.
pub const ERROR_PAGE_TITLE_PREFIX: &str = "Error loading";

/// Prefix of inline placeholder pages.
pub const PLACEHOLDER_URL_PREFIX: &str = "data:text/html";

/// Scheme prefix of Firefox extension pages.
pub const EXTENSION_URL_PREFIX: &str = "moz-extension";

/// A saved set of browser windows.
///
/// A tree with zero windows is valid and renders to an empty document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTree {
    pub windows: Vec<Window>,
}

impl SessionTree {
    /// Create a tree from a list of windows.
    pub fn new(windows: Vec<Window>) -> Self {
        Self { windows }
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Total number of tabs across all windows.
    pub fn tab_count(&self) -> usize {
        self.windows.iter().map(|w| w.tabs.len()).sum()
    }

    /// Total number of history entries across all tabs.
    pub fn entry_count(&self) -> usize {
        self.windows
            .iter()
            .flat_map(|w| w.tabs.iter())
            .map(|t| t.entries.len())
            .sum()
    }
}

/// A browser window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window {
    /// Placement data, passed through untouched.
    pub geometry: Option<Geometry>,
    pub tabs: Vec<Tab>,
}

impl Window {
    pub fn new(tabs: Vec<Tab>) -> Self {
        Self {
            geometry: None,
            tabs,
        }
    }
}

/// Opaque window geometry.
///
/// qutebrowser stores a Qt blob here as a `!!binary` node. The YAML parser
/// resolves that tag into a plain string, so any string made only of
/// base64 characters is taken to be such a payload and re-tagged on the
/// way out. Anything else is kept as the parsed node.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Base64 text of a `!!binary` node, line breaks included.
    Binary(String),
    Plain(serde_yaml::Value),
}

impl Geometry {
    pub fn is_binary(&self) -> bool {
        matches!(self, Geometry::Binary(_))
    }
}

fn is_base64(text: &str) -> bool {
    !text.trim().is_empty()
        && text.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=') || c.is_ascii_whitespace()
        })
}

impl From<serde_yaml::Value> for Geometry {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::String(text) if is_base64(&text) => Geometry::Binary(text),
            other => Geometry::Plain(other),
        }
    }
}

impl Serialize for Geometry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Geometry::Binary(text) => serializer.serialize_str(text),
            Geometry::Plain(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_yaml::Value::deserialize(deserializer).map(Geometry::from)
    }
}

/// A tab and its history, oldest entry first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tab {
    pub active: bool,
    pub entries: Vec<HistoryEntry>,
}

impl Tab {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self {
            active: false,
            entries,
        }
    }

    /// First entry flagged active, if any.
    pub fn active_entry(&self) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.active)
    }
}

/// Scroll offset of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollPos {
    pub x: i64,
    pub y: i64,
}

impl ScrollPos {
    pub const ORIGIN: ScrollPos = ScrollPos { x: 0, y: 0 };
}

/// One page in a tab's history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: Option<String>,
    pub active: bool,
    /// URL originally requested before redirects (Firefox).
    pub original_uri: Option<String>,
    /// Last visit timestamp as written by the browser (qutebrowser).
    pub last_visited: Option<String>,
    pub pinned: bool,
    pub scroll_pos: ScrollPos,
    pub zoom: f64,
}

impl Default for HistoryEntry {
    fn default() -> Self {
        Self {
            url: String::new(),
            title: None,
            active: false,
            original_uri: None,
            last_visited: None,
            pinned: false,
            scroll_pos: ScrollPos::ORIGIN,
            zoom: 1.0,
        }
    }
}

impl HistoryEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn titled(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::new(url)
        }
    }

    /// Builder-style setter for the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether this entry has a URL worth rendering.
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Title text, empty when the browser recorded none.
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn is_extension_page(&self) -> bool {
        self.url.starts_with(EXTENSION_URL_PREFIX)
    }

    /// Error pages and inline placeholders left behind in history.
    pub fn is_dead_page(&self) -> bool {
        self.title_text().starts_with(ERROR_PAGE_TITLE_PREFIX)
            || self.url.starts_with(PLACEHOLDER_URL_PREFIX)
    }
}
