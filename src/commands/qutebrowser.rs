//! qutebrowser subcommands handler

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context as _, Result};
use tracing::{debug, info};

use tabstash::cli::{ExportArgs, QutebrowserArgs, QutebrowserCommands};
use tabstash::files::locate::{self, NameFilter};
use tabstash::notify::Urgency;
use tabstash::session::{self, Format, Layout, RenderOptions, Selection};
use tabstash::Context;

use super::{print_listing, run_rotation};

const SESSION_PATTERN: &str = r"\.ya?ml$";

#[derive(Debug, Clone)]
struct Paths {
    sessions: PathBuf,
    exports: PathBuf,
}

impl Paths {
    fn resolve(ctx: &Context, args: &QutebrowserArgs) -> Result<Self> {
        let config = &ctx.config.qutebrowser;
        let sessions = match &args.sessions_dir {
            Some(dir) => dir.clone(),
            None => config.sessions_dir()?,
        };
        let exports = match &args.export_dir {
            Some(dir) => dir.clone(),
            None => config.export_dir()?,
        };
        Ok(Self { sessions, exports })
    }
}

pub fn handle(ctx: &Context, args: QutebrowserArgs) -> Result<()> {
    let paths = Paths::resolve(ctx, &args)?;
    debug!(?paths, "qutebrowser paths");

    match args.command {
        QutebrowserCommands::Export(export_args) => {
            let Some(name) =
                locate::pick(&paths.sessions, &session_filter()?, ctx.selector(), "export")?
            else {
                return Ok(());
            };
            let written = export(&paths, &name, export_args)?;
            println!("{}", written.display());
            ctx.notifier().notify(
                "[qutebrowser]",
                &format!("Exported {}", written.display()),
                Urgency::Normal,
            );
            Ok(())
        }
        QutebrowserCommands::ExportAll(export_args) => {
            let names = locate::collect(&paths.sessions, &session_filter()?)?;
            for name in &names {
                let written = export(&paths, name, export_args)?;
                println!("{}", written.display());
            }
            info!(count = names.len(), "exported all sessions");
            Ok(())
        }
        QutebrowserCommands::Fix => {
            let Some(name) =
                locate::pick(&paths.sessions, &session_filter()?, ctx.selector(), "fix")?
            else {
                return Ok(());
            };
            let fixed = fix_in_place(&paths.sessions.join(&name))?;
            println!("Fixed {}", fixed.display());
            ctx.notifier().notify(
                "[qutebrowser]",
                &format!("Fixed {}", name),
                Urgency::Normal,
            );
            Ok(())
        }
        QutebrowserCommands::List => print_listing(&paths.sessions, &session_filter()?),
        QutebrowserCommands::Rotate(rotate) => {
            let keep = rotate.keep_minutes.or(ctx.config.qutebrowser.keep_minutes);
            let filter = NameFilter::new(&[ctx.config.qutebrowser.rotate_pattern.as_str()])
                .context("Invalid qutebrowser.rotate_pattern")?;
            run_rotation(&paths.sessions, keep, &filter, rotate.dry_run, SystemTime::now())
        }
    }
}

/// Export one session as `<export dir>/<name up to the first dot>.org`.
fn export(paths: &Paths, name: &str, args: ExportArgs) -> Result<PathBuf> {
    let source = paths.sessions.join(name);
    let tree = Format::Qutebrowser
        .load(&source)
        .with_context(|| format!("Failed to load session {}", source.display()))?;

    let layout = if args.flat { Layout::Flat } else { Layout::Outline };
    let options = RenderOptions::new(layout, Selection::for_format(Format::Qutebrowser, false))
        .raw_urls(!args.titled);

    let stem = name.split('.').next().unwrap_or(name);
    fs::create_dir_all(&paths.exports)
        .with_context(|| format!("Failed to create {}", paths.exports.display()))?;
    let dest = paths
        .exports
        .join(format!("{}.{}", stem, layout.extension(Format::Qutebrowser)));

    session::dump(&dest, Some(&tree), Format::Qutebrowser, &options)
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    info!(source = %source.display(), dest = %dest.display(), "exported session");
    Ok(dest)
}

/// Normalize a session file and write it back as YAML.
fn fix_in_place(path: &Path) -> Result<PathBuf> {
    let tree = Format::Qutebrowser
        .load(path)
        .with_context(|| format!("Failed to load session {}", path.display()))?;
    let fixed = session::fix(tree);
    let options = RenderOptions::new(Layout::Native, Selection::ActiveOnly);
    session::dump(path, Some(&fixed), Format::Qutebrowser, &options)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "session fixed");
    Ok(path.to_path_buf())
}

fn session_filter() -> Result<NameFilter> {
    Ok(NameFilter::new(&[SESSION_PATTERN])?)
}
