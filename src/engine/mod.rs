// src/engine/mod.rs

//! The watch loop.
//!
//! - [`core`] is a synchronous decision core: it consumes `RuntimeEvent`s
//!   and answers with `CoreCommand`s (rebuild, report, shut down). It owns
//!   the debounce gate and does no IO, so it is tested without Tokio.
//! - [`runtime`] is the async IO shell: it drains the event channel, feeds
//!   the core, and executes rebuild-then-restart sequentially.

use std::future::Future;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::types::ChangeEvent;

/// Events flowing into the runtime from the watcher and signal handlers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A filesystem change under the project root.
    FileChanged(ChangeEvent),
    /// The watcher reported an internal error. Logged, never fatal.
    WatcherError(String),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

impl RuntimeEvent {
    /// Time the event should be judged at: when the watcher observed the
    /// change, or now for events that carry no timestamp.
    pub fn observed_at(&self) -> Instant {
        match self {
            RuntimeEvent::FileChanged(change) => change.observed_at,
            RuntimeEvent::WatcherError(_) | RuntimeEvent::ShutdownRequested => Instant::now(),
        }
    }
}

/// Wait for `signal` and turn it into a `ShutdownRequested` event.
///
/// Returns whether the event was delivered. A signal listener that fails to
/// install is logged and never requests shutdown.
pub async fn forward_shutdown<F>(signal: F, tx: mpsc::Sender<RuntimeEvent>) -> bool
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        error!(error = %err, "failed to listen for Ctrl-C; stop with another signal");
        return false;
    }

    info!("Ctrl-C received; shutting down");
    tx.send(RuntimeEvent::ShutdownRequested).await.is_ok()
}

pub mod core;
pub mod runtime;

pub use core::{CoreCommand, CoreRuntime, CoreStep};
pub use runtime::{RunSummary, Runtime};
