// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LovewatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::LovewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

pub fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_project(cfg)?;
    validate_watch(cfg)?;
    validate_bundle(cfg)?;
    validate_runtime(cfg)?;
    Ok(())
}

fn validate_project(cfg: &RawConfigFile) -> Result<()> {
    if let Some(output) = &cfg.project.output {
        if output.as_os_str().is_empty() || output.file_name().is_none() {
            return Err(LovewatchError::Config(format!(
                "[project].output must name a file (got {:?})",
                output
            )));
        }
    }
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.debounce_ms == 0 {
        return Err(LovewatchError::Config(
            "[watch].debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.watch.extensions.is_empty() {
        return Err(LovewatchError::Config(
            "[watch].extensions must list at least one suffix".to_string(),
        ));
    }

    for ext in cfg.watch.extensions.iter() {
        if ext.len() < 2 || !ext.starts_with('.') {
            return Err(LovewatchError::Config(format!(
                "[watch].extensions entry '{}' must look like \".lua\"",
                ext
            )));
        }
    }

    Ok(())
}

fn validate_bundle(cfg: &RawConfigFile) -> Result<()> {
    if cfg.bundle.ignore.iter().any(|p| p.is_empty()) {
        return Err(LovewatchError::Config(
            "[bundle].ignore must not contain empty patterns (they would ignore every file)"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_runtime(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runtime.command.trim().is_empty() {
        return Err(LovewatchError::Config(
            "[runtime].command must not be empty".to_string(),
        ));
    }
    Ok(())
}
