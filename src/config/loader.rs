// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LovewatchError, Result};

/// File name looked up in the project root when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Lovewatch.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the checked form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the project config.
///
/// - `explicit = Some(path)`: the file must exist.
/// - `explicit = None`: `Lovewatch.toml` under `root` is used when present,
///   otherwise built-in defaults apply.
pub fn load_project_config(root: &Path, explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(LovewatchError::Config(format!(
                    "config file {:?} does not exist",
                    path
                )));
            }
            load_and_validate(path)
        }
        None => {
            let path = default_config_path(root);
            if path.is_file() {
                debug!(?path, "loading project config");
                load_and_validate(&path)
            } else {
                debug!(?path, "no project config found; using defaults");
                Ok(ConfigFile::default())
            }
        }
    }
}

pub fn default_config_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_CONFIG_FILE)
}
