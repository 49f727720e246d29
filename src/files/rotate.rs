//! Age-based cleanup of dump and session directories.
//!
//! A file expires when its change time is strictly before `now - keep`.
//! On Unix the inode change time is used so that copying a session back
//! into place does not make it look old; elsewhere the modification time
//! stands in.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use super::locate::NameFilter;

/// A file and the moment it last changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    pub path: PathBuf,
    pub changed: SystemTime,
}

/// Change time of a file.
#[cfg(unix)]
pub fn change_time(meta: &Metadata) -> io::Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;

    let secs = meta.ctime();
    let nanos = meta.ctime_nsec().clamp(0, 999_999_999) as u32;
    let time = if secs >= 0 {
        SystemTime::UNIX_EPOCH.checked_add(Duration::new(secs.unsigned_abs(), nanos))
    } else {
        SystemTime::UNIX_EPOCH
            .checked_sub(Duration::from_secs(secs.unsigned_abs()))
            .and_then(|t| t.checked_add(Duration::from_nanos(u64::from(nanos))))
    };
    time.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "change time out of range"))
}

/// Change time of a file.
#[cfg(not(unix))]
pub fn change_time(meta: &Metadata) -> io::Result<SystemTime> {
    meta.modified()
}

/// Stamps of the regular files directly under `root` that pass `filter`.
pub fn stamps(root: &Path, filter: &NameFilter) -> io::Result<Vec<FileStamp>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if !filter.matches(&name.to_string_lossy()) {
            continue;
        }
        out.push(FileStamp {
            path: entry.path(),
            changed: change_time(&meta)?,
        });
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// Paths among `stamps` that changed strictly before `now - keep`.
pub fn select_expired(stamps: &[FileStamp], keep: Duration, now: SystemTime) -> Vec<PathBuf> {
    let Some(cutoff) = now.checked_sub(keep) else {
        return Vec::new();
    };
    stamps
        .iter()
        .filter(|s| s.changed < cutoff)
        .map(|s| s.path.clone())
        .collect()
}

/// Files under `root` that [`rotate`] would delete.
pub fn expired(
    root: &Path,
    keep: Duration,
    filter: &NameFilter,
    now: SystemTime,
) -> io::Result<Vec<PathBuf>> {
    Ok(select_expired(&stamps(root, filter)?, keep, now))
}

/// Delete expired files under `root` and return what was removed.
///
/// Stops at the first failed deletion.
pub fn rotate(
    root: &Path,
    keep: Duration,
    filter: &NameFilter,
    now: SystemTime,
) -> io::Result<Vec<PathBuf>> {
    let doomed = expired(root, keep, filter, now)?;
    debug!(root = %root.display(), count = doomed.len(), "rotating");
    for path in &doomed {
        fs::remove_file(path)?;
        info!(path = %path.display(), "removed expired file");
    }
    Ok(doomed)
}

/// Convert a minute count from configuration or the command line.
pub fn minutes(n: u64) -> Duration {
    Duration::from_secs(n.saturating_mul(60))
}
