// src/bundle/mod.rs

//! Packaging the project tree into a single `.love` archive.
//!
//! - [`ignore`] holds the substring-based ignore filter.
//! - [`archive`] walks the tree and writes the zip container atomically.

pub mod archive;
pub mod ignore;

pub use archive::{build_archive, collect_entries, ArchiveBuilder, ArchiveEntry, BuildSummary};
pub use ignore::{IgnoreSpec, DEFAULT_IGNORE_PATTERNS};
