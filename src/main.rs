use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clap_derive::{Args, Parser, Subcommand};
use time::macros::format_description;
use time::UtcOffset;
use tracing::{error, Level};
use tracing_subscriber::fmt::time::OffsetTime;

use crate::command::patch::{PatchOptions, DEFAULT_DELAY_MS, DEFAULT_PLATFORM};
use crate::report::RunReport;

mod command;
mod error;
mod meta;
mod report;
mod scan;

#[derive(Debug, Parser)]
#[command(version, about = "Batch edits the bundle config in sub-package .meta files")]
struct Args {
    /// Directory containing the sub-package directories and their .meta files.
    /// Defaults to assets/subpackages in the current directory or next to the executable.
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Log every inserted key
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add missing platform entries to every .meta file (default)
    Patch(PatchArgs),
    /// Restore every .meta file from its -bak backup
    Revert(RevertArgs),
}

#[derive(Debug, Args)]
struct PatchArgs {
    /// Platform identifier to configure. Can be given multiple times.
    #[arg(short, long = "platform", default_value = DEFAULT_PLATFORM)]
    platforms: Vec<String>,

    /// Also set isBundle, bundleName and priority if they are missing
    #[arg(long)]
    mark_bundle: bool,

    /// Copy each .meta file to .meta-bak before the first write
    #[arg(long)]
    backup: bool,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Pause between sub-packages in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,
}

#[derive(Debug, Args)]
struct RevertArgs {
    /// Pause between sub-packages in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,
}

impl From<PatchArgs> for PatchOptions {
    fn from(args: PatchArgs) -> Self {
        PatchOptions {
            platforms: args.platforms,
            mark_bundle: args.mark_bundle,
            backup: args.backup,
            dry_run: args.dry_run,
            delay: Duration::from_millis(args.delay_ms),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(report) => {
            println!("\n{}", report);
            ExitCode::from(exit_code(&report))
        }
        Err(err) => {
            error!("Batch run failed: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> anyhow::Result<RunReport> {
    let root = command::resolve_root(&args.root)
        .context("Failed to resolve sub-package directory")?;

    let report = match args.command {
        Some(Command::Patch(patch_args)) => command::patch::patch(&root, &patch_args.into())?,
        Some(Command::Revert(revert_args)) => {
            command::revert::revert(&root, Duration::from_millis(revert_args.delay_ms))?
        }
        None => command::patch::patch(&root, &PatchOptions::default())?,
    };

    Ok(report)
}

/// 0 when every sub-package succeeded, 1 when some failed. Fatal errors exit with 2.
fn exit_code(report: &RunReport) -> u8 {
    if report.is_success() { 0 } else { 1 }
}

fn init_logging(verbose: bool) {
    // must be read before any other thread is spawned
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(offset, format_description!("[hour]:[minute]:[second]"));
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_timer(timer)
        .with_max_level(level)
        .with_target(false)
        .init();
}
