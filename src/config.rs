//! Configuration file handling.
//!
//! Lives at `$XDG_CONFIG_HOME/tabstash/config.toml`. Every field has a
//! default, so a missing or partial file is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::files::filename::{self, DEFAULT_TEMPLATE};

const APP_DIR: &str = "tabstash";
const CONFIG_FILE: &str = "config.toml";

/// Name pattern of the timestamped sessions qutebrowser saves.
pub const TIMED_SESSION_PATTERN: &str =
    r"session-(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})-[0-9]{2}-[0-9]{2}-[0-9]{2}";

/// Errors from reading or writing the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine {0} directory")]
    NoDir(&'static str),

    #[error("Failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write config {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub selector: SelectorConfig,
    pub dump: DumpConfig,
    pub firefox: FirefoxConfig,
    pub qutebrowser: QutebrowserConfig,
}

/// Which picker to run and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One of `dmenu`, `rofi`, `bemenu`.
    pub tool: String,
    pub font: Option<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            tool: "dmenu".to_string(),
            font: None,
        }
    }
}

/// Output naming shared by both browsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Template for generated dump names, see [`filename::Template`].
    pub filename_template: String,
    pub basename_max_length: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            filename_template: DEFAULT_TEMPLATE.to_string(),
            basename_max_length: filename::Config::default().basename_max_length,
        }
    }
}

impl DumpConfig {
    pub fn filename_config(&self) -> filename::Config {
        filename::Config::new(self.basename_max_length)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirefoxConfig {
    /// Directory holding `recovery.jsonlz4` / `previous.jsonlz4`.
    pub sessions_dir: Option<PathBuf>,
    /// Where dumps are written.
    pub dumps_dir: Option<PathBuf>,
    pub dump_basename: String,
    pub keep_minutes: Option<u64>,
}

impl Default for FirefoxConfig {
    fn default() -> Self {
        Self {
            sessions_dir: None,
            dumps_dir: None,
            dump_basename: "firefox-session-auto".to_string(),
            keep_minutes: None,
        }
    }
}

impl FirefoxConfig {
    pub fn sessions_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.sessions_dir {
            Some(dir) => expand_home(dir),
            None => Ok(home_dir()?
                .join(".mozilla/firefox/profile.default/sessionstore-backups")),
        }
    }

    pub fn dumps_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.dumps_dir {
            Some(dir) => expand_home(dir),
            None => Ok(data_dir()?.join("firefox-dumps")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QutebrowserConfig {
    /// qutebrowser's own `sessions` directory.
    pub sessions_dir: Option<PathBuf>,
    /// Where Org exports are written.
    pub export_dir: Option<PathBuf>,
    pub keep_minutes: Option<u64>,
    /// Only sessions whose name matches this are rotated.
    pub rotate_pattern: String,
}

impl Default for QutebrowserConfig {
    fn default() -> Self {
        Self {
            sessions_dir: None,
            export_dir: None,
            keep_minutes: None,
            rotate_pattern: TIMED_SESSION_PATTERN.to_string(),
        }
    }
}

impl QutebrowserConfig {
    pub fn sessions_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.sessions_dir {
            Some(dir) => expand_home(dir),
            None => Ok(home_dir()?.join(".local/share/qutebrowser/sessions")),
        }
    }

    pub fn export_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.export_dir {
            Some(dir) => expand_home(dir),
            None => Ok(data_dir()?.join("qutebrowser-exports")),
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoDir("config"))?;
        Ok(base.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(write_err)
    }
}

fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoDir("home"))
}

fn data_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir().ok_or(ConfigError::NoDir("data"))?;
    Ok(base.join(APP_DIR))
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home_dir()?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}
