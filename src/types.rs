// src/types.rs

//! Small value types shared between the watcher, the decision core and tests.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use notify::EventKind;
use notify::event::ModifyKind;

/// What happened to a path, as far as the watch loop cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Create,
    Write,
    Remove,
    Rename,
}

impl OperationKind {
    /// Map a raw notify event kind onto our four operation kinds.
    ///
    /// Access, metadata-only and "other" events carry no content change and
    /// map to `None`.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(OperationKind::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(OperationKind::Rename),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(_) => Some(OperationKind::Write),
            EventKind::Remove(_) => Some(OperationKind::Remove),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationKind::Create => "CREATE",
            OperationKind::Write => "WRITE",
            OperationKind::Remove => "REMOVE",
            OperationKind::Rename => "RENAME",
        };
        f.write_str(s)
    }
}

/// A single `(path, operation)` pair delivered by the filesystem watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub op: OperationKind,
    /// When the watcher saw the change. The debounce gate judges the event
    /// by this time, not by when the watch loop gets round to it.
    pub observed_at: Instant,
}

impl ChangeEvent {
    /// A change observed now.
    pub fn new(path: impl Into<PathBuf>, op: OperationKind) -> Self {
        Self::observed(path, op, Instant::now())
    }

    pub fn observed(path: impl Into<PathBuf>, op: OperationKind, observed_at: Instant) -> Self {
        Self {
            path: path.into(),
            op,
            observed_at,
        }
    }

    pub fn write(path: impl Into<PathBuf>) -> Self {
        Self::new(path, OperationKind::Write)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
