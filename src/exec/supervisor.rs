// src/exec/supervisor.rs

//! Lifecycle of the single game-runtime child process.
//!
//! State machine: `Stopped -> Starting -> Running -> Stopping -> Stopped`,
//! plus `Running -> Stopped` when the child exits on its own.
//!
//! All state lives in one `Slot` behind one async mutex. `stop`, `start` and
//! `restart` hold that mutex for their whole duration, so two restarts can
//! never interleave and a new child is only spawned after the previous one's
//! exit was confirmed by `wait`.
//!
//! Each launch gets a background waiter task that owns the `Child`. It
//! either sees the child exit on its own, or receives a kill request, kills
//! and reaps the child. In both cases it reports the exit over a oneshot
//! *before* touching the slot, so a `stop` holding the mutex can block on
//! that report without deadlocking against the waiter.

use std::process::ExitStatus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Child;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{LovewatchError, Result};
use crate::exec::launch::LaunchSpec;

/// Default bound on waiting for a killed runtime to be reaped.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReport {
    /// Killed on request of the supervisor.
    Terminated,
    /// Exited on its own (normal exit or crash).
    Exited(ExitStatus),
    /// `wait` itself failed; the process is assumed gone.
    WaitFailed,
}

struct ActiveChild {
    generation: u64,
    pid: Option<u32>,
    kill_tx: oneshot::Sender<()>,
    exited_rx: oneshot::Receiver<ExitReport>,
    waiter: JoinHandle<()>,
}

struct Slot {
    state: ProcessState,
    /// Incremented on every successful launch.
    generation: u64,
    child: Option<ActiveChild>,
}

/// Decrements the live-children counter when dropped, including when the
/// waiter task is aborted.
struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns at most one running child process.
pub struct ProcessSupervisor {
    slot: Arc<Mutex<Slot>>,
    live: Arc<AtomicUsize>,
    stop_timeout: Option<Duration>,
}

impl std::fmt::Debug for ProcessSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessSupervisor")
            .field("live", &self.live.load(Ordering::SeqCst))
            .field("stop_timeout", &self.stop_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                state: ProcessState::Stopped,
                generation: 0,
                child: None,
            })),
            live: Arc::new(AtomicUsize::new(0)),
            stop_timeout: Some(DEFAULT_STOP_TIMEOUT),
        }
    }

    /// Bound the terminate-and-wait step. `None` waits indefinitely.
    pub fn with_stop_timeout(mut self, stop_timeout: Option<Duration>) -> Self {
        self.stop_timeout = stop_timeout;
        self
    }

    pub async fn state(&self) -> ProcessState {
        self.slot.lock().await.state
    }

    pub async fn pid(&self) -> Option<u32> {
        self.slot.lock().await.child.as_ref().and_then(|c| c.pid)
    }

    /// Number of successful launches so far.
    pub async fn launches(&self) -> u64 {
        self.slot.lock().await.generation
    }

    /// Children spawned whose exit has not been confirmed yet. Never above 1.
    ///
    /// Lock-free, so it can be sampled while a restart is in flight.
    pub fn live_children(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Launch the runtime. Fails with `AlreadyRunning` if a child is alive,
    /// and with `ProcessLaunch` if spawning fails (the supervisor then stays
    /// `Stopped` and a later call may succeed).
    pub async fn start(&self, launch: &LaunchSpec) -> Result<()> {
        let mut slot = self.slot.lock().await;
        self.start_locked(&mut slot, launch)
    }

    /// Kill the runtime and wait until its exit is confirmed. A no-op when
    /// nothing is running.
    pub async fn stop(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        self.stop_locked(&mut slot).await
    }

    /// `stop` followed by `start`, atomically with respect to every other
    /// supervisor operation.
    ///
    /// A stop timeout is logged and the launch proceeds anyway; the timed
    /// out child has been handed to `kill_on_drop` by then.
    pub async fn restart(&self, launch: &LaunchSpec) -> Result<()> {
        let mut slot = self.slot.lock().await;

        if let Err(err) = self.stop_locked(&mut slot).await {
            warn!(error = %err, "previous runtime did not stop cleanly; starting anyway");
        }

        self.start_locked(&mut slot, launch)
    }

    fn start_locked(&self, slot: &mut Slot, launch: &LaunchSpec) -> Result<()> {
        if let Some(active) = &slot.child {
            return Err(LovewatchError::AlreadyRunning(active.pid));
        }

        slot.state = ProcessState::Starting;
        info!(program = %launch.program(), args = ?launch.arguments(), "starting runtime");

        let child = match launch.command().spawn() {
            Ok(child) => child,
            Err(source) => {
                slot.state = ProcessState::Stopped;
                return Err(LovewatchError::ProcessLaunch {
                    program: launch.program().to_string(),
                    source,
                });
            }
        };

        self.live.fetch_add(1, Ordering::SeqCst);
        let live_guard = LiveGuard(Arc::clone(&self.live));

        slot.generation += 1;
        let generation = slot.generation;
        let pid = child.id();

        let (kill_tx, kill_rx) = oneshot::channel();
        let (exited_tx, exited_rx) = oneshot::channel();

        let waiter = tokio::spawn(wait_for_exit(
            child,
            kill_rx,
            exited_tx,
            Arc::clone(&self.slot),
            live_guard,
            generation,
        ));

        slot.child = Some(ActiveChild {
            generation,
            pid,
            kill_tx,
            exited_rx,
            waiter,
        });
        slot.state = ProcessState::Running;

        info!(pid = ?pid, generation, "runtime started");
        Ok(())
    }

    async fn stop_locked(&self, slot: &mut Slot) -> Result<()> {
        let Some(active) = slot.child.take() else {
            slot.state = ProcessState::Stopped;
            debug!("stop requested but no runtime is running");
            return Ok(());
        };

        let ActiveChild {
            pid,
            kill_tx,
            exited_rx,
            waiter,
            ..
        } = active;

        slot.state = ProcessState::Stopping;
        info!(pid = ?pid, "stopping runtime");

        // Fails only if the waiter already saw the child exit on its own.
        let _ = kill_tx.send(());

        let confirmed = match self.stop_timeout {
            Some(limit) => tokio::time::timeout(limit, exited_rx).await.map_err(|_| limit),
            None => Ok(exited_rx.await),
        };

        slot.state = ProcessState::Stopped;

        match confirmed {
            Ok(Ok(report)) => {
                debug!(pid = ?pid, ?report, "runtime termination confirmed");
                Ok(())
            }
            Ok(Err(_)) => {
                warn!(pid = ?pid, "runtime waiter ended without reporting an exit");
                Ok(())
            }
            Err(limit) => {
                // Dropping the child inside the aborted waiter re-issues the kill.
                waiter.abort();
                Err(LovewatchError::StopTimeout(limit))
            }
        }
    }
}

/// Background waiter for one child.
async fn wait_for_exit(
    mut child: Child,
    mut kill_rx: oneshot::Receiver<()>,
    exited_tx: oneshot::Sender<ExitReport>,
    slot: Arc<Mutex<Slot>>,
    live_guard: LiveGuard,
    generation: u64,
) {
    let pid = child.id();

    let report = tokio::select! {
        status = child.wait() => match status {
            Ok(status) => ExitReport::Exited(status),
            Err(err) => {
                warn!(pid = ?pid, error = %err, "failed to wait for runtime");
                ExitReport::WaitFailed
            }
        },
        // A dropped sender means the supervisor is gone: kill as well.
        _ = &mut kill_rx => kill_and_reap(&mut child, pid).await,
    };

    match report {
        ExitReport::Terminated => debug!(pid = ?pid, "runtime terminated by supervisor"),
        ExitReport::Exited(status) if status.success() => {
            info!(pid = ?pid, "runtime exited")
        }
        ExitReport::Exited(status) => {
            warn!(pid = ?pid, status = %status, "runtime exited with failure")
        }
        ExitReport::WaitFailed => {}
    }

    drop(child);
    drop(live_guard);
    let _ = exited_tx.send(report);

    // Blocks while a stop/restart holds the slot; by then that operation has
    // already taken our child out, and the generation check makes this a no-op.
    let mut slot = slot.lock().await;
    if slot.child.as_ref().is_some_and(|c| c.generation == generation) {
        slot.child = None;
        slot.state = ProcessState::Stopped;
        info!(pid = ?pid, "runtime stopped");
    }
}

async fn kill_and_reap(child: &mut Child, pid: Option<u32>) -> ExitReport {
    match child.kill().await {
        Ok(()) => ExitReport::Terminated,
        Err(err) => {
            warn!(pid = ?pid, error = %err, "failed to kill runtime; waiting for it to exit");
            match child.wait().await {
                Ok(status) => ExitReport::Exited(status),
                Err(_) => ExitReport::WaitFailed,
            }
        }
    }
}
