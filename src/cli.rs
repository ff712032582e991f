// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `lovewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lovewatch",
    version,
    about = "Bundle a LÖVE project into a .love archive and restart the game on every change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project config file (TOML).
    ///
    /// Default: `Lovewatch.toml` in the current working directory. A missing
    /// default file is fine; a missing explicit path is an error.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LOVEWATCH_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Bundle the project into a .love file.
    Bundle(OutputArgs),

    /// Watch the project directory, bundle and run LÖVE when changes are detected.
    Watch(WatchArgs),

    /// Fetch a well-known library into a subdirectory of the project.
    Add {
        /// Library name (e.g. `hump`).
        name: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output archive path.
    ///
    /// Default: `<current directory name>.love`.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// Game runtime executable to launch with the archive.
    #[arg(long, value_name = "PATH")]
    pub love: Option<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
