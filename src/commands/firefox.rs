//! Firefox subcommands handler

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{bail, Context as _, Result};
use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use tabstash::cli::{FirefoxArgs, FirefoxCommands};
use tabstash::files::filename;
use tabstash::files::locate::{self, NameFilter};
use tabstash::notify::Urgency;
use tabstash::session::{self, Format, Layout, RenderOptions, Selection};
use tabstash::Context;

use super::{print_listing, run_rotation};

/// Names of files `list`, `remove` and `rotate` treat as dumps.
const DUMP_PATTERN: &str = r"\.(org|json)$";

/// Where Firefox keeps its backups and where dumps go.
#[derive(Debug, Clone)]
pub struct Paths {
    pub sessions: PathBuf,
    pub dumps: PathBuf,
}

impl Paths {
    fn resolve(ctx: &Context, args: &FirefoxArgs) -> Result<Self> {
        let config = &ctx.config.firefox;
        let sessions = match &args.sessions_dir {
            Some(dir) => dir.clone(),
            None => config.sessions_dir()?,
        };
        let dumps = match &args.dumps_dir {
            Some(dir) => dir.clone(),
            None => config.dumps_dir()?,
        };
        Ok(Self { sessions, dumps })
    }
}

/// How a single dump should be produced.
#[derive(Debug, Clone)]
pub struct DumpRequest {
    pub layout: Layout,
    pub keep_tabs_history: bool,
    pub raw: bool,
    pub out: Option<String>,
    pub basename: String,
}

pub fn handle(ctx: &Context, args: FirefoxArgs) -> Result<()> {
    let paths = Paths::resolve(ctx, &args)?;
    debug!(?paths, "firefox paths");

    match args.command {
        FirefoxCommands::Dump {
            raw,
            json,
            flat,
            keep_tabs_history,
            out,
            dump_basename,
        } => {
            let layout = if json {
                Layout::Native
            } else if flat {
                Layout::Flat
            } else {
                Layout::Outline
            };
            let request = DumpRequest {
                layout,
                keep_tabs_history,
                raw,
                out,
                basename: dump_basename
                    .unwrap_or_else(|| ctx.config.firefox.dump_basename.clone()),
            };
            let written = dump(ctx, &paths, &request, Local::now().naive_local())?;
            println!("{}", written.display());
            ctx.notifier().notify(
                "[firefox]",
                &format!("Dumped session to {}", written.display()),
                Urgency::Normal,
            );
            Ok(())
        }
        FirefoxCommands::List => print_listing(&paths.dumps, &dump_filter()?),
        FirefoxCommands::Remove => remove(ctx, &paths.dumps),
        FirefoxCommands::Rotate(rotate) => {
            let keep = rotate.keep_minutes.or(ctx.config.firefox.keep_minutes);
            run_rotation(&paths.dumps, keep, &dump_filter()?, rotate.dry_run, SystemTime::now())
        }
    }
}

/// Load the current Firefox session and write it to the dumps directory.
///
/// Returns the path written.
pub fn dump(
    ctx: &Context,
    paths: &Paths,
    request: &DumpRequest,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let source = locate::latest_candidate(&paths.sessions);
    info!(source = %source.display(), "reading firefox session");
    let tree = Format::Firefox
        .load(&source)
        .with_context(|| format!("Failed to load session {}", source.display()))?;

    let options = RenderOptions::new(
        request.layout,
        Selection::for_format(Format::Firefox, request.keep_tabs_history),
    )
    .raw_urls(request.raw);

    let name = match &request.out {
        Some(name) => name.clone(),
        None => filename::generate(
            &request.basename,
            &ctx.config.dump.filename_template,
            request.layout.extension(Format::Firefox),
            &ctx.config.dump.filename_config(),
            now,
        )?,
    };

    fs::create_dir_all(&paths.dumps)
        .with_context(|| format!("Failed to create {}", paths.dumps.display()))?;
    let dest = paths.dumps.join(name);
    session::dump(&dest, Some(&tree), Format::Firefox, &options)
        .with_context(|| format!("Failed to write {}", dest.display()))?;

    info!(dest = %dest.display(), windows = tree.windows.len(), "dump written");
    Ok(dest)
}

fn remove(ctx: &Context, dumps: &Path) -> Result<()> {
    let Some(name) = locate::pick(dumps, &dump_filter()?, ctx.selector(), "remove")? else {
        debug!("nothing selected for removal");
        return Ok(());
    };
    let target = dumps.join(&name);
    if !target.is_file() {
        bail!("No such dump: {}", target.display());
    }

    fs::remove_file(&target).with_context(|| format!("Failed to remove {}", target.display()))?;
    info!(path = %target.display(), "removed dump");
    println!("Removed {}", target.display());
    ctx.notifier().notify(
        "[firefox]",
        &format!("Removed {}", target.display()),
        Urgency::Normal,
    );
    Ok(())
}

fn dump_filter() -> Result<NameFilter> {
    Ok(NameFilter::new(&[DUMP_PATTERN])?)
}
