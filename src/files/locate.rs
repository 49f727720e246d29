//! Finding session files on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::selector::{Selector, SelectorError};

/// Snapshot Firefox keeps while it is running.
pub const RECOVERY_FILE: &str = "recovery.jsonlz4";

/// Snapshot Firefox leaves behind after a clean shutdown.
pub const PREVIOUS_FILE: &str = "previous.jsonlz4";

/// Errors from locating or picking a session file.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("Cannot read directory {path}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("Invalid file name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// The Firefox backup to read when no file was named explicitly.
///
/// Prefers the live recovery file and falls back to the previous-session
/// backup. The returned path is not checked for existence beyond that.
pub fn latest_candidate(root: &Path) -> PathBuf {
    let recovery = root.join(RECOVERY_FILE);
    if recovery.is_file() {
        recovery
    } else {
        root.join(PREVIOUS_FILE)
    }
}

/// File name filter. Matches everything when empty.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    patterns: Vec<Regex>,
}

impl NameFilter {
    /// Accept every name.
    pub fn any() -> Self {
        Self::default()
    }

    /// Accept names matching at least one of `patterns`.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(name))
    }
}

/// Names of the regular files directly under `root` that pass `filter`,
/// sorted by name.
pub fn collect(root: &Path, filter: &NameFilter) -> Result<Vec<String>, LocateError> {
    let read_err = |source| LocateError::ReadDir {
        path: root.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if filter.matches(&name) {
            names.push(name);
        }
    }

    names.sort();
    debug!(root = %root.display(), count = names.len(), "collected session files");
    Ok(names)
}

/// Let the user pick one file out of `root`.
///
/// Returns the chosen name, or `None` when the user cancelled.
pub fn pick(
    root: &Path,
    filter: &NameFilter,
    selector: &dyn Selector,
    prompt: &str,
) -> Result<Option<String>, LocateError> {
    let names = collect(root, filter)?;
    Ok(selector.select(&names, prompt)?)
}
