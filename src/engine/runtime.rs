// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::bundle::ArchiveBuilder;
use crate::errors::Result;
use crate::exec::{LaunchSpec, ProcessBackend};
use crate::types::ChangeEvent;
use crate::watch::path_utils::display_path;

use super::core::{CoreCommand, CoreRuntime};
use super::RuntimeEvent;

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rebuild attempts, successful or not.
    pub rebuilds: u64,
    pub failed_rebuilds: u64,
    /// Restart attempts, successful or not.
    pub restarts: u64,
    pub failed_restarts: u64,
    pub watcher_errors: u64,
}

/// Drives the watch loop: feeds `RuntimeEvent`s into the core and, on a
/// trigger, rebuilds the archive and then restarts the runtime.
///
/// Rebuild and restart run inline, so no new event is looked at until the
/// restarted runtime is up (or failed to launch). Events keep queueing in the
/// channel meanwhile and are judged by the debounce gate afterwards.
pub struct Runtime<P: ProcessBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    builder: ArchiveBuilder,
    launch: LaunchSpec,
    process: P,
    summary: RunSummary,
}

impl<P: ProcessBackend> fmt::Debug for Runtime<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("builder", &self.builder)
            .field("launch", &self.launch)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl<P: ProcessBackend> Runtime<P> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        builder: ArchiveBuilder,
        launch: LaunchSpec,
        process: P,
    ) -> Self {
        Self {
            core,
            event_rx,
            builder,
            launch,
            process,
            summary: RunSummary::default(),
        }
    }

    /// Main event loop. Returns on `ShutdownRequested` or when every event
    /// sender is gone, after stopping the runtime.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("watch loop started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            // Events queued during a rebuild are judged by observation time.
            let observed_at = event.observed_at();
            let step = self.core.step(event, observed_at);

            for command in step.commands {
                self.execute_command(command).await;
            }

            if !step.keep_running {
                break;
            }
        }

        if let Err(err) = self.process.stop().await {
            warn!(error = %err, "failed to stop runtime during shutdown");
        }

        info!(summary = ?self.summary, "watch loop exiting");
        Ok(self.summary)
    }

    async fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::Rebuild { trigger } => self.rebuild_and_restart(&trigger).await,
            CoreCommand::ReportWatcherError(msg) => {
                self.summary.watcher_errors += 1;
                error!(error = %msg, "watcher error");
            }
            CoreCommand::Shutdown => info!("shutdown requested"),
        }
    }

    /// Rebuild, then restart. The restart happens even when the rebuild
    /// failed, in which case the runtime gets the previous archive.
    async fn rebuild_and_restart(&mut self, trigger: &ChangeEvent) {
        info!(
            path = %display_path(self.builder.source_dir(), &trigger.path),
            op = %trigger.op,
            "rebuilding"
        );

        self.summary.rebuilds += 1;
        if let Err(err) = self.builder.build_blocking_task().await {
            self.summary.failed_rebuilds += 1;
            error!(error = %err, "rebuild failed; restarting with the previous archive");
        }

        self.summary.restarts += 1;
        if let Err(err) = self.process.restart(&self.launch).await {
            self.summary.failed_restarts += 1;
            error!(program = %self.launch.program(), error = %err, "failed to restart runtime");
        }
    }
}
