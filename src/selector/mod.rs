//! Interactive selection through a dmenu-style picker.
//!
//! The session commands never draw UI themselves. They hand a list of
//! options to a [`Selector`] and get back the chosen line, or nothing when
//! the user cancelled.

mod menu;

pub use menu::{Menu, MenuKind};

/// Something that lets the user pick one line out of many.
pub trait Selector {
    /// Human-readable name for logs and error messages.
    fn name(&self) -> &str;

    /// Ask the user to pick one of `options`.
    ///
    /// Matching is case-insensitive. With no options the prompt acts as a
    /// free-text input. Returns `Ok(None)` when nothing was chosen.
    fn select(&self, options: &[String], prompt: &str) -> Result<Option<String>, SelectorError>;
}

/// Errors that can occur while running a selector.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("Unknown selector tool: '{0}' (expected dmenu, rofi or bemenu)")]
    UnknownTool(String),

    #[error("Selector tool '{0}' not found in PATH")]
    NotFound(&'static str),

    #[error("Selector tool '{tool}' failed: {message}")]
    Failed { tool: &'static str, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build the selector named in configuration.
pub fn from_name(name: &str, font: Option<String>) -> Result<Box<dyn Selector>, SelectorError> {
    let kind: MenuKind = name.parse()?;
    Ok(Box::new(Menu::new(kind, font)))
}
