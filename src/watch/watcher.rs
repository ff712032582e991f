// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::{LovewatchError, Result};
use crate::types::{ChangeEvent, OperationKind};
use crate::watch::path_utils::is_hidden;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: Arc<Mutex<RecommendedWatcher>>,
    root: PathBuf,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WatcherHandle {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Every directory under `root` that should be subscribed, sorted: the root
/// itself plus all subdirectories whose name does not start with a dot
/// (hidden directories are pruned together with their contents).
///
/// Traversal errors are returned, not skipped.
pub fn watch_directories(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs = vec![root.to_path_buf()];
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut children = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() && !is_hidden(&entry.path()) {
                children.push(entry.path());
            }
        }
        dirs.extend(children.iter().cloned());
        stack.extend(children);
    }

    dirs.sort();
    Ok(dirs)
}

/// Spawn a filesystem watcher over `root` and forward every change as a
/// [`RuntimeEvent`] into `runtime_tx`.
///
/// Each non-hidden directory is subscribed non-recursively, so hidden
/// directories such as `.git` never generate events. Directories created,
/// or renamed or moved into the tree, after startup are added to the
/// subscription when their event arrives.
///
/// Failing to enumerate the tree or to subscribe any directory is a setup
/// error. Errors reported later by the watcher itself are forwarded as
/// `RuntimeEvent::WatcherError`.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world. Events
    // are stamped here, before any queueing delay.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<(Instant, notify::Result<Event>)>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Err(err) = event_tx.send((Instant::now(), res)) {
                // The receiving task is gone; tracing may already be torn down.
                eprintln!("lovewatch: failed to forward notify event: {err}");
            }
        },
        Config::default(),
    )
    .map_err(|e| LovewatchError::Setup(format!("cannot create file watcher: {e}")))?;

    let dirs = watch_directories(&root).map_err(|e| {
        LovewatchError::Setup(format!("cannot enumerate directories under {:?}: {e}", root))
    })?;

    for dir in dirs.iter() {
        watcher.watch(dir, RecursiveMode::NonRecursive).map_err(|e| {
            LovewatchError::Setup(format!("cannot watch directory {:?}: {e}", dir))
        })?;
    }

    info!(root = ?root, directories = dirs.len(), "file watcher started");

    let inner = Arc::new(Mutex::new(watcher));
    let task_watcher = Arc::clone(&inner);

    tokio::spawn(async move {
        while let Some((observed_at, res)) = event_rx.recv().await {
            let forwarded = match res {
                Ok(event) => forward_event(event, observed_at, &task_watcher, &runtime_tx).await,
                Err(err) => runtime_tx
                    .send(RuntimeEvent::WatcherError(err.to_string()))
                    .await
                    .is_ok(),
            };

            if !forwarded {
                debug!("runtime channel closed; stopping watcher forwarding");
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: inner, root })
}

/// Translate one notify event into `ChangeEvent`s and send them on.
///
/// Returns `false` once the runtime side has gone away.
async fn forward_event(
    event: Event,
    observed_at: Instant,
    watcher: &Arc<Mutex<RecommendedWatcher>>,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    let Some(op) = OperationKind::from_notify(&event.kind) else {
        return true;
    };

    for path in event.paths {
        if brings_in_directory(op, &path) {
            subscribe_new_directory(watcher, &path);
        }

        if runtime_tx
            .send(RuntimeEvent::FileChanged(ChangeEvent::observed(path, op, observed_at)))
            .await
            .is_err()
        {
            return false;
        }
    }

    true
}

/// Created directories and directories renamed or moved into the tree need
/// their own watch. For a rename the old path no longer exists and is skipped
/// by the `is_dir` check.
fn brings_in_directory(op: OperationKind, path: &Path) -> bool {
    matches!(op, OperationKind::Create | OperationKind::Rename) && path.is_dir() && !is_hidden(path)
}

fn subscribe_new_directory(watcher: &Arc<Mutex<RecommendedWatcher>>, dir: &Path) {
    let dirs = match watch_directories(dir) {
        Ok(dirs) => dirs,
        Err(err) => {
            warn!(path = ?dir, error = %err, "cannot enumerate new directory; not watching it");
            return;
        }
    };

    let mut guard = match watcher.lock() {
        Ok(g) => g,
        Err(_) => {
            warn!("watcher mutex poisoned; not watching new directory");
            return;
        }
    };

    for d in dirs {
        match guard.watch(&d, RecursiveMode::NonRecursive) {
            Ok(()) => debug!(path = ?d, "watching new directory"),
            Err(err) => warn!(path = ?d, error = %err, "failed to watch new directory"),
        }
    }
}
