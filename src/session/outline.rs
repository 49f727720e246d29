//! Session dumps: native re-serialization and Org outlines.
//!
//! An outline lists the pages of a session as Org headings. Which pages
//! show up is decided by the [`Selection`], how they are nested by the
//! [`Layout`].
//!
//! ```text
//! * window 1
//! ** [[https://example.com][Example]]
//! *** [[https://example.com/next][Next page]]
//! * window 2
//! ** https://rust-lang.org
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::codec::Format;
use super::error::{Result, SessionError};
use super::model::{HistoryEntry, SessionTree, Tab};

/// Shape of the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Browser's own format, for backups.
    Native,
    /// `* window N` headings with pages nested below.
    #[default]
    Outline,
    /// Every page at top level, no window headings.
    Flat,
}

impl Layout {
    /// File extension of a dump in this layout.
    pub fn extension(&self, format: Format) -> &'static str {
        match self {
            Layout::Native => format.native_extension(),
            Layout::Outline | Layout::Flat => "org",
        }
    }
}

/// Which history entries of a tab end up in an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Walk history oldest first, skipping extension pages. Without
    /// `with_history` only the first rendered page of each tab is kept.
    History { with_history: bool },
    /// Only the first entry flagged active in each tab.
    ActiveOnly,
}

impl Selection {
    /// Default selection for a browser family.
    pub fn for_format(format: Format, with_history: bool) -> Self {
        match format {
            Format::Firefox => Selection::History { with_history },
            Format::Qutebrowser => Selection::ActiveOnly,
        }
    }
}

/// Rendering switches for a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub layout: Layout,
    pub selection: Selection,
    /// Bare URLs instead of `[[url][title]]` links.
    pub raw_urls: bool,
}

impl RenderOptions {
    pub fn new(layout: Layout, selection: Selection) -> Self {
        Self {
            layout,
            selection,
            raw_urls: false,
        }
    }

    pub fn raw_urls(mut self, raw: bool) -> Self {
        self.raw_urls = raw;
        self
    }
}

/// Render a session to bytes.
pub fn render(session: &SessionTree, format: Format, options: &RenderOptions) -> Result<Vec<u8>> {
    match options.layout {
        Layout::Native => format.encode(session),
        Layout::Outline | Layout::Flat => Ok(outline_lines(session, options)
            .into_iter()
            .flat_map(|line| {
                let mut bytes = line.into_bytes();
                bytes.push(b'\n');
                bytes
            })
            .collect()),
    }
}

/// Render a session straight into a file, truncating it first.
///
/// A missing session is refused with [`SessionError::EmptySession`] before
/// the destination is touched. On a write error the file is left as far as
/// it got and should be regenerated.
pub fn dump<P: AsRef<Path>>(
    path: P,
    session: Option<&SessionTree>,
    format: Format,
    options: &RenderOptions,
) -> Result<()> {
    let path = path.as_ref();
    let session = session.ok_or(SessionError::EmptySession)?;
    debug!(
        path = %path.display(),
        ?options,
        windows = session.windows.len(),
        "dumping session"
    );

    let rendered = render(session, format, options)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&rendered)?;
    writer.flush()?;

    Ok(())
}

/// Outline lines without terminators.
pub fn outline_lines(session: &SessionTree, options: &RenderOptions) -> Vec<String> {
    let flat = options.layout == Layout::Flat;
    let mut lines = Vec::new();

    for (index, window) in session.windows.iter().enumerate() {
        if !flat {
            lines.push(format!("* window {}", index + 1));
        }
        for tab in &window.tabs {
            for (depth, entry) in selected_entries(tab, options.selection) {
                let stars = match (flat, depth) {
                    (true, _) => "*",
                    (false, Depth::Current) => "**",
                    (false, Depth::History) => "***",
                };
                lines.push(format!("{} {}", stars, link(entry, options.raw_urls)));
            }
        }
    }

    lines
}

/// Nesting of a page below its tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    /// First rendered page of a tab.
    Current,
    /// Later pages from the tab's history.
    History,
}

fn selected_entries(tab: &Tab, selection: Selection) -> Vec<(Depth, &HistoryEntry)> {
    match selection {
        Selection::ActiveOnly => tab
            .active_entry()
            .filter(|entry| entry.has_url())
            .map(|entry| vec![(Depth::Current, entry)])
            .unwrap_or_default(),
        Selection::History { with_history } => {
            let mut picked = Vec::new();
            for entry in &tab.entries {
                if entry.is_extension_page() || !entry.has_url() {
                    continue;
                }
                let depth = if picked.is_empty() {
                    Depth::Current
                } else {
                    Depth::History
                };
                picked.push((depth, entry));
                if !with_history {
                    debug!(url = %entry.url, "dropped tab history");
                    break;
                }
            }
            picked
        }
    }
}

/// Org link for an entry, or the bare URL.
fn link(entry: &HistoryEntry, raw: bool) -> String {
    match entry.title_text() {
        _ if raw => entry.url.clone(),
        "" => format!("[[{}]]", entry.url),
        title => format!("[[{}][{}]]", entry.url, title),
    }
}
