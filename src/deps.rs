// src/deps.rs

//! `lovewatch add <name>`: fetch a well-known LÖVE library into the project.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::anyhow;
use tokio::process::Command;
use tracing::info;

use crate::errors::{LovewatchError, Result};

/// Libraries `add` knows how to fetch, by name.
pub const KNOWN_LIBRARIES: &[(&str, &str)] = &[("hump", "https://github.com/vrld/hump.git")];

pub fn repository_url(name: &str) -> Option<&'static str> {
    KNOWN_LIBRARIES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, url)| *url)
}

/// Shallow-clone library `name` into `<root>/<name>` with the `git` CLI.
///
/// Fails without touching the disk if the name is unknown or the target
/// directory already exists.
pub async fn add_dependency(root: &Path, name: &str) -> Result<PathBuf> {
    let url = repository_url(name).ok_or_else(|| LovewatchError::UnknownDependency(name.to_string()))?;

    let target = root.join(name);
    if target.exists() {
        return Err(LovewatchError::Setup(format!(
            "{:?} already exists; remove it first to re-fetch {name}",
            target
        )));
    }

    info!(%url, target = ?target, "cloning dependency");

    let status = Command::new("git")
        .args(["clone", "--depth", "1"])
        .arg(url)
        .arg(&target)
        .stdin(Stdio::null())
        .status()
        .await
        .map_err(|source| LovewatchError::ProcessLaunch {
            program: "git".to_string(),
            source,
        })?;

    if !status.success() {
        return Err(LovewatchError::Other(anyhow!(
            "git clone of {url} exited with {status}"
        )));
    }

    println!("Successfully cloned {name} into {}", target.display());
    Ok(target)
}
