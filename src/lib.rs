// src/lib.rs

pub mod bundle;
pub mod cli;
pub mod config;
pub mod deps;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::bundle::{ArchiveBuilder, IgnoreSpec};
use crate::cli::{CliArgs, Command, WatchArgs};
use crate::config::{load_project_config, ConfigFile};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::{LovewatchError, Result};
use crate::exec::{LaunchSpec, ProcessSupervisor};
use crate::watch::{DebounceGate, RelevantExtensionSet};

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    let root = std::env::current_dir()
        .map_err(|e| LovewatchError::Setup(format!("cannot determine working directory: {e}")))?;
    let cfg = load_project_config(&root, args.config.as_deref())?;

    match args.command {
        Command::Bundle(out) => {
            let builder = archive_builder(&root, &cfg, out.output);
            let summary = builder.build_blocking_task().await?;
            info!("Project bundled as {}", summary.output.display());
            Ok(())
        }
        Command::Watch(watch_args) => run_watch(root, cfg, watch_args).await,
        Command::Add { name } => {
            deps::add_dependency(&root, &name).await?;
            Ok(())
        }
    }
}

/// `lovewatch watch`: bundle, launch, then rebuild and relaunch on every
/// relevant change until Ctrl-C.
///
/// - The initial bundle and the watch subscription are fatal on failure.
/// - The initial launch is not; the next change retries it.
async fn run_watch(root: PathBuf, cfg: ConfigFile, args: WatchArgs) -> Result<()> {
    let builder = archive_builder(&root, &cfg, args.output.output);

    builder
        .build_blocking_task()
        .await
        .map_err(|e| LovewatchError::Setup(format!("initial bundle failed: {e}")))?;

    let launch = launch_spec(&cfg, args.love, builder.output());
    let supervisor = ProcessSupervisor::new().with_stop_timeout(cfg.runtime.stop_timeout());

    if let Err(err) = supervisor.start(&launch).await {
        error!(program = %launch.program(), error = %err, "failed to start runtime");
    }

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let _watcher = watch::spawn_watcher(&root, rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    tokio::spawn(engine::forward_shutdown(tokio::signal::ctrl_c(), rt_tx.clone()));
    drop(rt_tx);

    let gate = DebounceGate::new(
        RelevantExtensionSet::new(cfg.watch.extensions.iter().cloned()),
        cfg.watch.debounce(),
    );
    let core = CoreRuntime::new(gate);

    let runtime = Runtime::new(core, rt_rx, builder, launch, supervisor);
    let summary = runtime.run().await?;

    info!(
        rebuilds = summary.rebuilds,
        restarts = summary.restarts,
        "lovewatch stopped"
    );
    Ok(())
}

fn archive_builder(root: &Path, cfg: &ConfigFile, cli_output: Option<PathBuf>) -> ArchiveBuilder {
    let output = resolve_output(root, cli_output.or_else(|| cfg.project.output.clone()));
    ArchiveBuilder::new(root, output, IgnoreSpec::new(cfg.bundle.ignore.iter().cloned()))
}

/// Runtime command: `--love` wins over `[runtime].command`; config args come
/// first and the archive path is always the last argument.
pub fn launch_spec(cfg: &ConfigFile, cli_program: Option<String>, archive: &Path) -> LaunchSpec {
    let program = cli_program.unwrap_or_else(|| cfg.runtime.command.clone());
    LaunchSpec::new(program)
        .args(cfg.runtime.args.iter())
        .arg(archive)
}

/// Resolve the archive path: an explicit path (relative to `root` unless
/// absolute), or `<root basename>.love`.
pub fn resolve_output(root: &Path, explicit: Option<PathBuf>) -> PathBuf {
    match explicit {
        Some(path) if path.is_absolute() => path,
        Some(path) => root.join(path),
        None => root.join(default_output_file(root)),
    }
}

/// `<directory name>.love`, or `game.love` when the directory has no name
/// (e.g. `/`).
pub fn default_output_file(root: &Path) -> PathBuf {
    let stem = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "game".to_string());
    PathBuf::from(format!("{stem}.love"))
}
