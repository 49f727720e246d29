//! Config subcommands handler

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use tabstash::cli::ConfigCommands;
use tabstash::Config;

pub fn handle(command: ConfigCommands, path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::config_path()?,
    };
    match command {
        ConfigCommands::Show => handle_show(&path),
        ConfigCommands::Edit => handle_edit(&path),
    }
}

/// Show current configuration as TOML, defaults filled in.
fn handle_show(path: &Path) -> Result<()> {
    let config = Config::load_from(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("# {}", path.display());
    print!("{}", toml_str);
    Ok(())
}

/// Open configuration file in the default editor.
///
/// Uses $EDITOR environment variable (defaults to 'vi').
#[cfg(not(tarpaulin_include))]
fn handle_edit(path: &Path) -> Result<()> {
    // Ensure config exists
    if !path.exists() {
        Config::default().save_to(path)?;
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    println!("Opening {} with {}", path.display(), editor);

    let status = std::process::Command::new(&editor)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to open editor '{}'", editor))?;
    if !status.success() {
        bail!("Editor '{}' exited with {}", editor, status);
    }

    // Catch typos before the next real run does
    Config::load_from(path)
        .with_context(|| format!("Saved config is invalid: {}", path.display()))?;
    Ok(())
}
