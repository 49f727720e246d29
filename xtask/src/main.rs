//! Development tasks for tabstash.
//!
//! Run with `cargo run -p xtask -- <task>`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_mangen::Man;

#[derive(Parser)]
#[command(name = "xtask", about = "tabstash development tasks")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages for tabstash and its subcommands
    Man {
        /// Output directory
        #[arg(short, long, default_value = "target/man")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    match Xtask::parse().task {
        Task::Man { out } => generate_man(&out),
    }
}

fn generate_man(out: &std::path::Path) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;

    let cmd = tabstash::cli::Cli::command();
    write_page(out, &cmd, "tabstash")?;

    for sub in cmd.get_subcommands() {
        let name = format!("tabstash-{}", sub.get_name());
        write_page(out, sub, &name)?;
        for nested in sub.get_subcommands() {
            let nested_name = format!("{}-{}", name, nested.get_name());
            write_page(out, nested, &nested_name)?;
        }
    }

    println!("Man pages written to {}", out.display());
    Ok(())
}

fn write_page(out: &std::path::Path, cmd: &clap::Command, name: &str) -> Result<()> {
    let mut buffer = Vec::new();
    Man::new(cmd.clone()).title(name).render(&mut buffer)?;
    let path = out.join(format!("{}.1", name));
    fs::write(&path, buffer).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
