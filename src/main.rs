//! tabstash CLI entry point

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use tabstash::cli::{Cli, Commands};
use tabstash::notify::{Notifier, NotifySend, Silent, Urgency};
use tabstash::{selector, Config, Context};

fn main() {
    tabstash::init_logging();
    let cli = Cli::parse();
    let quiet = cli.quiet;

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        if !quiet {
            NotifySend::default().notify("tabstash", &format!("{:#}", err), Urgency::Critical);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        selector_tool,
        selector_font,
        quiet,
        command,
    } = cli;

    match command {
        Commands::Completions { shell } => commands::completions::handle(shell),
        Commands::Config(cmd) => commands::config::handle(cmd, config.as_deref()),
        Commands::Firefox(args) => {
            let ctx = build_context(config, selector_tool, selector_font, quiet)?;
            commands::firefox::handle(&ctx, args)
        }
        Commands::Qutebrowser(args) => {
            let ctx = build_context(config, selector_tool, selector_font, quiet)?;
            commands::qutebrowser::handle(&ctx, args)
        }
    }
}

/// Load configuration and apply command line overrides.
fn build_context(
    config_path: Option<PathBuf>,
    selector_tool: Option<String>,
    selector_font: Option<String>,
    quiet: bool,
) -> Result<Context> {
    let mut config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(tool) = selector_tool {
        config.selector.tool = tool;
    }
    if selector_font.is_some() {
        config.selector.font = selector_font;
    }
    debug!(?config, "effective configuration");

    let selector = selector::from_name(&config.selector.tool, config.selector.font.clone())?;
    let notifier: Box<dyn Notifier> = if quiet {
        Box::new(Silent)
    } else {
        Box::new(NotifySend::default())
    };

    Ok(Context::new(config, selector, notifier))
}
