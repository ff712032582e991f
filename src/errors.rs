// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! `Setup` and `Config` errors are fatal at startup. Everything else is
//! raised during steady-state operation, where the watch loop logs it and
//! keeps going.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LovewatchError {
    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to bundle {path:?}: {source}")]
    Build {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to launch '{program}': {source}")]
    ProcessLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Runtime process is already running (pid {0:?})")]
    AlreadyRunning(Option<u32>),

    #[error("Runtime process did not confirm termination within {0:?}")]
    StopTimeout(Duration),

    #[error("Watcher error: {0}")]
    Watcher(String),

    #[error("Unknown dependency: {0}")]
    UnknownDependency(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<notify::Error> for LovewatchError {
    fn from(err: notify::Error) -> Self {
        LovewatchError::Watcher(err.to_string())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LovewatchError>;
