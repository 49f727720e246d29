//! dmenu, rofi and bemenu wrappers.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::str::FromStr;

use tracing::debug;

use super::{Selector, SelectorError};

/// Maximum number of lines a vertical menu shows at once.
const MAX_LINES: usize = 15;

/// Supported picker programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Dmenu,
    Rofi,
    Bemenu,
}

impl MenuKind {
    /// Binary name.
    pub fn command(&self) -> &'static str {
        match self {
            Self::Dmenu => "dmenu",
            Self::Rofi => "rofi",
            Self::Bemenu => "bemenu",
        }
    }
}

impl FromStr for MenuKind {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dmenu" => Ok(Self::Dmenu),
            "rofi" => Ok(Self::Rofi),
            "bemenu" => Ok(Self::Bemenu),
            _ => Err(SelectorError::UnknownTool(s.to_string())),
        }
    }
}

/// A dmenu-compatible picker run as a child process.
///
/// Options are sorted and piped to stdin one per line; the picked line is
/// read back from stdout.
#[derive(Debug, Clone)]
pub struct Menu {
    kind: MenuKind,
    font: Option<String>,
}

impl Menu {
    pub fn new(kind: MenuKind, font: Option<String>) -> Self {
        Self { kind, font }
    }

    /// Command line arguments for a menu over `count` options.
    pub fn args(&self, prompt: &str, count: usize) -> Vec<String> {
        let lines = count.clamp(1, MAX_LINES).to_string();
        let mut args: Vec<String> = Vec::new();

        match self.kind {
            MenuKind::Rofi => {
                args.extend(["-dmenu", "-i", "-p", prompt].map(String::from));
            }
            MenuKind::Dmenu | MenuKind::Bemenu => {
                args.extend(["-i", "-p", prompt, "-l", lines.as_str()].map(String::from));
                if let Some(font) = &self.font {
                    let flag = if self.kind == MenuKind::Dmenu { "-fn" } else { "--fn" };
                    args.push(flag.to_string());
                    args.push(font.clone());
                }
            }
        }

        args
    }
}

impl Selector for Menu {
    fn name(&self) -> &str {
        self.kind.command()
    }

    fn select(&self, options: &[String], prompt: &str) -> Result<Option<String>, SelectorError> {
        let mut sorted = options.to_vec();
        sorted.sort();
        let input = sorted.join("\n");
        let args = self.args(prompt, sorted.len());
        debug!(tool = self.kind.command(), ?args, options = sorted.len(), "running selector");

        let mut child = Command::new(self.kind.command())
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => SelectorError::NotFound(self.kind.command()),
                _ => SelectorError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // The picker may exit without reading everything
            match stdin.write_all(input.as_bytes()) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }

        let output = child.wait_with_output()?;
        let picked = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if picked.is_empty() {
            debug!(tool = self.kind.command(), "nothing selected");
            return Ok(None);
        }

        if !output.status.success() {
            return Err(SelectorError::Failed {
                tool: self.kind.command(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(Some(picked))
    }
}
