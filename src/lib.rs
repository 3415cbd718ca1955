// src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod discover;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod invocation;
pub mod locate;
pub mod logging;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{Settings, load_settings};
use crate::console::{Console, StdoutConsole, banner};
use crate::discover::Discoverer;
use crate::engine::Supervisor;
use crate::exec::RealProcessBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::invocation::Invocation;
use crate::locate::{RunnerLocator, bundle_dir};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings (defaults, `Treerun.toml`, CLI overrides)
/// - runner lookup
/// - argument inference and task directory discovery
/// - the supervisor that runs the task everywhere
pub async fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;
    let cwd = std::env::current_dir().context("resolving current directory")?;
    let console: Arc<dyn Console> = Arc::new(StdoutConsole);

    let mut raw = load_settings(&fs, args.config.as_deref(), &cwd)?;
    raw.apply_overrides(args.runner.clone(), args.task_file.clone());
    let settings = Settings::try_from(raw)?;
    debug!(?settings, "settings resolved");

    run_with(&args.args, &settings, &fs, &cwd, console, args.dry_run).await
}

/// Run with explicit settings, filesystem and console.
///
/// With `dry_run` the banner is printed and nothing is spawned.
pub async fn run_with(
    positional: &[String],
    settings: &Settings,
    fs: &dyn FileSystem,
    cwd: &Path,
    console: Arc<dyn Console>,
    dry_run: bool,
) -> Result<()> {
    let bundle = bundle_dir();
    let runner = RunnerLocator::from_settings(&settings.runner, cwd, bundle.as_deref()).require(fs)?;
    info!(%runner, "using task runner");

    let invocation = Invocation::from_args(positional, &settings.default_task, cwd, fs);
    let directories = Discoverer::new(fs, &settings.task_file).discover(&invocation.roots);
    info!(
        task = %invocation.task,
        roots = ?invocation.roots,
        found = directories.len(),
        "task directories discovered"
    );
    if directories.is_empty() {
        info!("no task directories found");
    }

    console.write_str(&banner(&runner, &invocation.task, directories.as_slice()));

    if dry_run {
        debug!("dry-run complete (no execution)");
        return Ok(());
    }

    let backend = RealProcessBackend::new(Arc::clone(&console));
    Supervisor::new(backend, console)
        .run(&directories, &invocation.task, &runner)
        .await?;
    Ok(())
}
