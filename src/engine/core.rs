// src/engine/core.rs

//! Pure decision core of the watch loop.

use std::time::Instant;

use tracing::{debug, info};

use crate::engine::RuntimeEvent;
use crate::types::ChangeEvent;
use crate::watch::debounce::DebounceGate;

/// Command produced by the core, to be executed by the IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Rebuild the archive, then restart the runtime.
    Rebuild { trigger: ChangeEvent },
    /// Log a watcher failure.
    ReportWatcherError(String),
    /// Stop the runtime and leave the loop.
    Shutdown,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn idle() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn single(command: CoreCommand) -> Self {
        let keep_running = command != CoreCommand::Shutdown;
        Self {
            commands: vec![command],
            keep_running,
        }
    }
}

/// Core state: the debounce gate (which owns the last-trigger timestamp)
/// and a trigger counter.
#[derive(Debug, Clone)]
pub struct CoreRuntime {
    gate: DebounceGate,
    triggers: u64,
}

impl CoreRuntime {
    pub fn new(gate: DebounceGate) -> Self {
        Self { gate, triggers: 0 }
    }

    pub fn gate(&self) -> &DebounceGate {
        &self.gate
    }

    /// Number of accepted triggers so far.
    pub fn triggers(&self) -> u64 {
        self.triggers
    }

    /// Handle one event observed at `now`.
    ///
    /// On a positive decision the gate's timestamp is updated here, before
    /// the shell starts rebuilding, so events that arrive during the rebuild
    /// fall into the same window.
    pub fn step(&mut self, event: RuntimeEvent, now: Instant) -> CoreStep {
        match event {
            RuntimeEvent::FileChanged(change) => self.handle_change(change, now),
            RuntimeEvent::WatcherError(msg) => CoreStep::single(CoreCommand::ReportWatcherError(msg)),
            RuntimeEvent::ShutdownRequested => CoreStep::single(CoreCommand::Shutdown),
        }
    }

    fn handle_change(&mut self, change: ChangeEvent, now: Instant) -> CoreStep {
        if !self.gate.relevant().is_relevant(&change) {
            return CoreStep::idle();
        }

        info!(path = ?change.path, op = %change.op, "change detected");

        if !self.gate.check(&change, now) {
            debug!(path = ?change.path, op = %change.op, "change suppressed by debounce policy");
            return CoreStep::idle();
        }

        self.triggers += 1;
        CoreStep::single(CoreCommand::Rebuild { trigger: change })
    }
}
