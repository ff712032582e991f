// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::bundle::ignore::DEFAULT_IGNORE_PATTERNS;
use crate::watch::debounce::DEFAULT_DEBOUNCE_MS;
use crate::watch::relevance::DEFAULT_EXTENSIONS;

/// Project configuration as read from `Lovewatch.toml`.
///
/// ```toml
/// [project]
/// output = "mygame.love"
///
/// [watch]
/// debounce_ms = 500
/// extensions = [".lua", ".png"]
///
/// [bundle]
/// ignore = [".git", ".DS_Store", "~", ".swp"]
///
/// [runtime]
/// command = "love"
/// args = []
/// stop_timeout_ms = 5000
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub bundle: BundleSection,

    #[serde(default)]
    pub runtime: RuntimeSection,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub project: ProjectSection,
    pub watch: WatchSection,
    pub bundle: BundleSection,
    pub runtime: RuntimeSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            project: raw.project,
            watch: raw.watch,
            bundle: raw.bundle,
            runtime: raw.runtime,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectSection {
    /// Archive path. When `None`, `<cwd basename>.love` is used.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Minimum interval between two accepted rebuild triggers.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// File suffixes whose writes trigger a rebuild.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl WatchSection {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            extensions: default_extensions(),
        }
    }
}

/// `[bundle]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleSection {
    /// Substring patterns; any file whose path contains one is left out of
    /// the archive.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

fn default_ignore() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect()
}

impl Default for BundleSection {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
        }
    }
}

/// `[runtime]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeSection {
    /// Executable launched with the archive path as its last argument.
    #[serde(default = "default_command")]
    pub command: String,

    /// Extra arguments placed before the archive path.
    #[serde(default)]
    pub args: Vec<String>,

    /// Upper bound on waiting for a killed runtime to exit. `0` waits forever.
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
}

impl RuntimeSection {
    pub fn stop_timeout(&self) -> Option<Duration> {
        match self.stop_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

fn default_command() -> String {
    "love".to_string()
}

fn default_stop_timeout_ms() -> u64 {
    5_000
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
            stop_timeout_ms: default_stop_timeout_ms(),
        }
    }
}
