// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The watch loop talks to a `ProcessBackend` instead of a concrete
//! supervisor, so tests can swap in a fake that records restarts without
//! spawning real processes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::Result;
use crate::exec::launch::LaunchSpec;
use crate::exec::supervisor::ProcessSupervisor;

pub type BackendFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// What the watch loop needs from whatever runs the game.
pub trait ProcessBackend: Send + Sync {
    /// Stop the current instance (if any) and launch a new one.
    fn restart<'a>(&'a self, launch: &'a LaunchSpec) -> BackendFuture<'a>;

    /// Stop the current instance (if any).
    fn stop(&self) -> BackendFuture<'_>;
}

impl ProcessBackend for ProcessSupervisor {
    fn restart<'a>(&'a self, launch: &'a LaunchSpec) -> BackendFuture<'a> {
        Box::pin(ProcessSupervisor::restart(self, launch))
    }

    fn stop(&self) -> BackendFuture<'_> {
        Box::pin(ProcessSupervisor::stop(self))
    }
}

impl<T: ProcessBackend + ?Sized> ProcessBackend for Arc<T> {
    fn restart<'a>(&'a self, launch: &'a LaunchSpec) -> BackendFuture<'a> {
        (**self).restart(launch)
    }

    fn stop(&self) -> BackendFuture<'_> {
        (**self).stop()
    }
}
