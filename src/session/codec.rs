//! Per-browser session codecs.
//!
//! Each browser family has its own on-disk layout. Those layouts are
//! private wire types here; everything outside this module works with the
//! shared [`SessionTree`]. Dispatch happens on the [`Format`] tag.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::container;
use super::error::{ParseError, Result, SessionError};
use super::model::{Geometry, HistoryEntry, ScrollPos, SessionTree, Tab, Window};

/// Session file format of a browser family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Firefox session store: JSON inside a `mozLz40` container.
    Firefox,
    /// qutebrowser session: plain YAML.
    Qutebrowser,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Firefox => "firefox",
            Format::Qutebrowser => "qutebrowser",
        }
    }

    /// Extension used for native (re-serialized) dumps.
    pub fn native_extension(&self) -> &'static str {
        match self {
            Format::Firefox => "json",
            Format::Qutebrowser => "yml",
        }
    }

    /// Load a session file as the browser stores it.
    ///
    /// Firefox files go through the container decoder first; qutebrowser
    /// files are read as-is.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<SessionTree> {
        let path = path.as_ref();
        debug!(format = %self, path = %path.display(), "loading session");
        let bytes = match self {
            Format::Firefox => container::read(path)?,
            Format::Qutebrowser => fs::read(path)?,
        };
        self.decode(&bytes)
    }

    /// Parse an uncompressed payload.
    pub fn decode(&self, bytes: &[u8]) -> Result<SessionTree> {
        let tree = match self {
            Format::Firefox => serde_json::from_slice::<FirefoxSession>(bytes)
                .map(SessionTree::from)
                .map_err(|e| self.parse_error(e.into()))?,
            Format::Qutebrowser => serde_yaml::from_slice::<QuteSession>(bytes)
                .map(SessionTree::from)
                .map_err(|e| self.parse_error(e.into()))?,
        };
        debug!(
            format = %self,
            windows = tree.windows.len(),
            tabs = tree.tab_count(),
            "parsed session"
        );
        Ok(tree)
    }

    /// Serialize a tree back into the browser's native (uncompressed) layout.
    ///
    /// Firefox records one selected tab per window and one current entry
    /// per tab, so only the first active tab and the first active entry
    /// survive. Fields the tree does not model are not written.
    pub fn encode(&self, tree: &SessionTree) -> Result<Vec<u8>> {
        match self {
            Format::Firefox => serde_json::to_vec(&FirefoxSession::from(tree))
                .map_err(|e| self.encode_error(e.into())),
            Format::Qutebrowser => serde_yaml::to_string(&QuteSession::from(tree))
                .map(|yaml| tag_binary_geometry(&yaml, &tree.windows).into_bytes())
                .map_err(|e| self.encode_error(e.into())),
        }
    }

    fn parse_error(&self, source: ParseError) -> SessionError {
        SessionError::Parse {
            format: self.name(),
            source,
        }
    }

    fn encode_error(&self, source: ParseError) -> SessionError {
        SessionError::Encode {
            format: self.name(),
            source,
        }
    }
}

// --- Firefox wire layout ---

#[derive(Debug, Default, Deserialize, Serialize)]
struct FirefoxSession {
    #[serde(default)]
    windows: Vec<FirefoxWindow>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct FirefoxWindow {
    #[serde(default)]
    tabs: Vec<FirefoxTab>,
    /// 1-based index of the selected tab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct FirefoxTab {
    #[serde(default)]
    entries: Vec<FirefoxEntry>,
    /// 1-based index of the current history entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct FirefoxEntry {
    #[serde(default)]
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(
        rename = "originalURI",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    original_uri: Option<String>,
}

impl From<FirefoxSession> for SessionTree {
    fn from(session: FirefoxSession) -> Self {
        let windows = session
            .windows
            .into_iter()
            .map(|window| {
                let selected = window.selected;
                let tabs = window
                    .tabs
                    .into_iter()
                    .enumerate()
                    .map(|(i, tab)| {
                        let current = tab.index;
                        let entries = tab
                            .entries
                            .into_iter()
                            .enumerate()
                            .map(|(j, entry)| HistoryEntry {
                                url: entry.url,
                                title: entry.title,
                                original_uri: entry.original_uri,
                                active: current == Some(j + 1),
                                ..HistoryEntry::default()
                            })
                            .collect();
                        Tab {
                            active: selected == Some(i + 1),
                            entries,
                        }
                    })
                    .collect();
                Window {
                    geometry: None,
                    tabs,
                }
            })
            .collect();
        SessionTree { windows }
    }
}

impl From<&SessionTree> for FirefoxSession {
    fn from(tree: &SessionTree) -> Self {
        let windows = tree
            .windows
            .iter()
            .map(|window| FirefoxWindow {
                selected: window.tabs.iter().position(|t| t.active).map(|i| i + 1),
                tabs: window
                    .tabs
                    .iter()
                    .map(|tab| FirefoxTab {
                        index: tab.entries.iter().position(|e| e.active).map(|i| i + 1),
                        entries: tab
                            .entries
                            .iter()
                            .map(|entry| FirefoxEntry {
                                url: entry.url.clone(),
                                title: entry.title.clone(),
                                original_uri: entry.original_uri.clone(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        FirefoxSession { windows }
    }
}

// --- qutebrowser wire layout ---

#[derive(Debug, Default, Deserialize, Serialize)]
struct QuteSession {
    #[serde(default)]
    windows: Vec<QuteWindow>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct QuteWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geometry: Option<Geometry>,
    #[serde(default)]
    tabs: Vec<QuteTab>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct QuteTab {
    #[serde(default)]
    active: bool,
    #[serde(default)]
    history: Vec<QutePage>,
}

#[derive(Debug, Deserialize, Serialize)]
struct QutePage {
    #[serde(default)]
    active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_visited: Option<String>,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    scroll_pos: ScrollPos,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default = "unit_zoom")]
    zoom: f64,
}

fn unit_zoom() -> f64 {
    1.0
}

const GEOMETRY_LINE: &str = "- geometry: ";

/// Put the `!!binary` tag back on window geometry.
///
/// serde_yaml can only emit local `!` tags, so the core tag is added to the
/// serialized text. Every window item starts with a `- ` line in column 0,
/// geometry first when present.
fn tag_binary_geometry(yaml: &str, windows: &[Window]) -> String {
    let mut windows = windows.iter();
    let mut out = String::with_capacity(yaml.len() + 16);
    for line in yaml.split_inclusive('\n') {
        if line.starts_with("- ") {
            let binary = windows
                .next()
                .and_then(|w| w.geometry.as_ref())
                .is_some_and(Geometry::is_binary);
            if let (true, Some(rest)) = (binary, line.strip_prefix(GEOMETRY_LINE)) {
                out.push_str(GEOMETRY_LINE);
                out.push_str("!!binary ");
                out.push_str(rest);
                continue;
            }
        }
        out.push_str(line);
    }
    out
}

impl From<QuteSession> for SessionTree {
    fn from(session: QuteSession) -> Self {
        let windows = session
            .windows
            .into_iter()
            .map(|window| Window {
                geometry: window.geometry,
                tabs: window
                    .tabs
                    .into_iter()
                    .map(|tab| Tab {
                        active: tab.active,
                        entries: tab
                            .history
                            .into_iter()
                            .map(|page| HistoryEntry {
                                url: page.url,
                                title: page.title,
                                active: page.active,
                                original_uri: None,
                                last_visited: page.last_visited,
                                pinned: page.pinned,
                                scroll_pos: page.scroll_pos,
                                zoom: page.zoom,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        SessionTree { windows }
    }
}

impl From<&SessionTree> for QuteSession {
    fn from(tree: &SessionTree) -> Self {
        let windows = tree
            .windows
            .iter()
            .map(|window| QuteWindow {
                geometry: window.geometry.clone(),
                tabs: window
                    .tabs
                    .iter()
                    .map(|tab| QuteTab {
                        active: tab.active,
                        history: tab
                            .entries
                            .iter()
                            .map(|entry| QutePage {
                                active: entry.active,
                                last_visited: entry.last_visited.clone(),
                                pinned: entry.pinned,
                                scroll_pos: entry.scroll_pos,
                                title: entry.title.clone(),
                                url: entry.url.clone(),
                                zoom: entry.zoom,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        QuteSession { windows }
    }
}
