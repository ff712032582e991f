// src/config/mod.rs

//! Project configuration for lovewatch.
//!
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_project_config, DEFAULT_CONFIG_FILE};
pub use model::{
    BundleSection, ConfigFile, ProjectSection, RawConfigFile, RuntimeSection, WatchSection,
};
pub use validate::validate_raw_config;
