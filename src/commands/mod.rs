//! Command handlers for the tabstash CLI

pub mod completions;
pub mod config;
pub mod firefox;
pub mod qutebrowser;

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{bail, Context as _, Result};
use humansize::{format_size, BINARY};

use tabstash::files::filename::timestamp_from_name;
use tabstash::files::locate::{self, NameFilter};
use tabstash::files::rotate;

/// Print matching files with their size and the timestamp in their name.
pub fn print_listing(dir: &Path, filter: &NameFilter) -> Result<()> {
    let names = locate::collect(dir, filter)?;
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);

    for name in &names {
        let size = fs::metadata(dir.join(name))
            .map(|m| format_size(m.len(), BINARY))
            .unwrap_or_else(|_| "?".to_string());
        let stamp = timestamp_from_name(name)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{:<width$}  {:>10}  {}", name, size, stamp, width = width);
    }

    Ok(())
}

/// Delete (or with `dry_run` only list) files in `dir` older than `keep`
/// minutes.
pub fn run_rotation(
    dir: &Path,
    keep: Option<u64>,
    filter: &NameFilter,
    dry_run: bool,
    now: SystemTime,
) -> Result<()> {
    let Some(minutes) = keep else {
        bail!("--keep-minutes is required when keep_minutes is not configured");
    };
    let keep = rotate::minutes(minutes);

    if dry_run {
        let doomed = rotate::expired(dir, keep, filter, now)
            .with_context(|| format!("Failed to scan {}", dir.display()))?;
        for path in &doomed {
            println!("Would remove {}", path.display());
        }
        return Ok(());
    }

    let removed = rotate::rotate(dir, keep, filter, now)
        .with_context(|| format!("Failed to rotate {}", dir.display()))?;
    for path in &removed {
        println!("Removed {}", path.display());
    }
    Ok(())
}
