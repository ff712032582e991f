// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launch`] describes how the game runtime is invoked.
//! - [`supervisor`] owns the lifecycle of the single runtime child process.
//! - [`backend`] provides the `ProcessBackend` trait the watch loop uses,
//!   implemented by `ProcessSupervisor` in production and by fakes in tests.

pub mod backend;
pub mod launch;
pub mod supervisor;

pub use backend::{BackendFuture, ProcessBackend};
pub use launch::LaunchSpec;
pub use supervisor::{ExitReport, ProcessState, ProcessSupervisor, DEFAULT_STOP_TIMEOUT};
