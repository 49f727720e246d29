//! Desktop notifications.

use std::process::{Command, Stdio};

use tracing::{debug, warn};

/// Notification urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Critical => "critical",
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, urgency: Urgency);
}

/// Sends notifications through `notify-send`.
///
/// Failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct NotifySend {
    app_name: String,
}

impl NotifySend {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Default for NotifySend {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

impl Notifier for NotifySend {
    fn notify(&self, title: &str, message: &str, urgency: Urgency) {
        debug!(title, message, urgency = urgency.as_str(), "sending notification");
        let status = Command::new("notify-send")
            .args(["--app-name", &self.app_name, "--urgency", urgency.as_str()])
            .arg(title)
            .arg(message)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(s) if s.success() => {}
            Ok(s) => warn!(code = ?s.code(), "notify-send exited with failure"),
            Err(e) => warn!(error = %e, "failed to run notify-send"),
        }
    }
}

/// Drops every notification. Used with `--quiet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, title: &str, message: &str, urgency: Urgency) {
        debug!(title, message, urgency = urgency.as_str(), "notification suppressed");
    }
}
