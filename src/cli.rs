//! Command line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Version string shown by `--version`.
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("TABSTASH_BUILD_DATE"),
    ")"
);

/// Version string shown by `--version`.
#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TABSTASH_BUILD_DATE"),
    ")"
);

#[derive(Debug, Parser)]
#[command(
    name = "tabstash",
    version = VERSION,
    about = "Dump, export and rotate browser sessions",
    long_about = "Reads Firefox and qutebrowser session files and writes them out as \
                  Org outlines or native backups.\n\n\
                  Logging goes to stderr and is controlled by TABSTASH_LOG \
                  (e.g. TABSTASH_LOG=debug)."
)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "TABSTASH_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Selector tool: dmenu, rofi or bemenu
    #[arg(
        short = 'T',
        long,
        global = true,
        env = "TABSTASH_SELECTOR_TOOL",
        value_name = "TOOL"
    )]
    pub selector_tool: Option<String>,

    /// Font passed to the selector tool
    #[arg(
        short = 'f',
        long,
        global = true,
        env = "TABSTASH_SELECTOR_FONT",
        value_name = "FONT"
    )]
    pub selector_font: Option<String>,

    /// Do not send desktop notifications
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Work with Firefox session backups
    #[command(visible_alias = "ff")]
    Firefox(FirefoxArgs),

    /// Work with qutebrowser sessions
    #[command(visible_alias = "qb")]
    Qutebrowser(QutebrowserArgs),

    /// Show or edit the configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct FirefoxArgs {
    /// Directory with recovery.jsonlz4 / previous.jsonlz4
    #[arg(long, env = "TABSTASH_FIREFOX_SESSIONS_DIR", value_name = "DIR")]
    pub sessions_dir: Option<PathBuf>,

    /// Directory dumps are written to
    #[arg(long, env = "TABSTASH_FIREFOX_DUMPS_DIR", value_name = "DIR")]
    pub dumps_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: FirefoxCommands,
}

#[derive(Debug, Subcommand)]
pub enum FirefoxCommands {
    /// Dump the current session
    #[command(long_about = "Dump the current session.\n\n\
        Reads recovery.jsonlz4 if present, otherwise previous.jsonlz4, and writes an \
        Org outline (default), a flat outline or plain JSON into the dumps directory.")]
    Dump {
        /// Write bare URLs without titles
        #[arg(long)]
        raw: bool,

        /// Write uncompressed JSON instead of an outline
        #[arg(short, long, conflicts_with = "flat")]
        json: bool,

        /// Flat outline without window headings
        #[arg(long)]
        flat: bool,

        /// Also dump the back/forward history of every tab
        #[arg(short, long)]
        keep_tabs_history: bool,

        /// Output file name inside the dumps directory
        #[arg(short, long, value_name = "FILE")]
        out: Option<String>,

        /// Basename for generated dump names
        #[arg(long, value_name = "NAME")]
        dump_basename: Option<String>,
    },

    /// List saved dumps
    #[command(visible_alias = "ls")]
    List,

    /// Pick a saved dump and delete it
    #[command(visible_alias = "rm")]
    Remove,

    /// Delete dumps older than the given age
    Rotate(RotateArgs),
}

#[derive(Debug, Args)]
pub struct QutebrowserArgs {
    /// qutebrowser sessions directory
    #[arg(long, env = "TABSTASH_QUTEBROWSER_SESSIONS_DIR", value_name = "DIR")]
    pub sessions_dir: Option<PathBuf>,

    /// Directory Org exports are written to
    #[arg(
        short = 'p',
        long,
        env = "TABSTASH_QUTEBROWSER_EXPORT_DIR",
        value_name = "DIR"
    )]
    pub export_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: QutebrowserCommands,
}

#[derive(Debug, Subcommand)]
pub enum QutebrowserCommands {
    /// Pick a session and export it as an Org outline
    Export(ExportArgs),

    /// Export every session as an Org outline
    ExportAll(ExportArgs),

    /// Pick a session, repair it and write it back
    #[command(long_about = "Pick a session, repair it and write it back.\n\n\
        Drops error pages, resets scroll position and zoom, and marks the last page \
        of every tab as active. Keys tabstash does not model, such as the window \
        `active` flag or `original_url`, are not written back.")]
    Fix,

    /// List saved sessions
    #[command(visible_alias = "ls")]
    List,

    /// Delete timestamped sessions older than the given age
    Rotate(RotateArgs),
}

#[derive(Debug, Clone, Copy, Args)]
pub struct ExportArgs {
    /// Flat outline without window headings
    #[arg(long)]
    pub flat: bool,

    /// Write `[[url][title]]` links instead of bare URLs
    #[arg(long)]
    pub titled: bool,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct RotateArgs {
    /// Remove files older than this many minutes
    #[arg(short, long, env = "TABSTASH_KEEP_MINUTES", value_name = "MINUTES")]
    pub keep_minutes: Option<u64>,

    /// Only print what would be removed
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Open configuration in $EDITOR
    Edit,
}
