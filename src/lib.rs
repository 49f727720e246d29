//! tabstash - browser session dumps and rotation
//!
//! Turns Firefox (`mozLz40`-compressed JSON) and qutebrowser (YAML) session
//! files into Org outlines, repairs qutebrowser sessions, and keeps dump
//! directories tidy.

pub mod cli;
pub mod config;
pub mod context;
pub mod files;
pub mod notify;
pub mod selector;
pub mod session;

pub use config::Config;
pub use context::Context;
pub use session::{Format, SessionError, SessionTree};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TABSTASH_LOG";

/// Install the stderr logger.
///
/// Reads the filter from `TABSTASH_LOG` and defaults to `warn`.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
