// src/bundle/archive.rs

//! Directory tree -> `.love` (zip) archive.
//!
//! The archive is written to a temporary file next to the output and renamed
//! over it only once every entry has been written, so a reader never sees a
//! half-written artifact and a failed build leaves the previous one intact.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::bundle::ignore::IgnoreSpec;
use crate::errors::{LovewatchError, Result};
use crate::watch::path_utils::relative_str;

/// One file scheduled for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Absolute (or root-joined) path on disk.
    pub source: PathBuf,
    /// Entry name inside the archive: relative, forward slashes.
    pub name: String,
}

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub entries: Vec<String>,
    pub bytes: u64,
}

/// Everything needed to (re)build the archive for a project.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    source_dir: PathBuf,
    output: PathBuf,
    ignore: IgnoreSpec,
}

impl ArchiveBuilder {
    pub fn new(source_dir: impl Into<PathBuf>, output: impl Into<PathBuf>, ignore: IgnoreSpec) -> Self {
        Self {
            source_dir: source_dir.into(),
            output: output.into(),
            ignore,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn ignore(&self) -> &IgnoreSpec {
        &self.ignore
    }

    /// Build synchronously. Walks and compresses the whole tree, so async
    /// callers should prefer [`ArchiveBuilder::build_blocking_task`].
    pub fn build(&self) -> Result<BuildSummary> {
        build_archive(&self.source_dir, &self.output, &self.ignore)
    }

    /// Run [`ArchiveBuilder::build`] on Tokio's blocking pool.
    pub async fn build_blocking_task(&self) -> Result<BuildSummary> {
        let builder = self.clone();
        tokio::task::spawn_blocking(move || builder.build())
            .await
            .map_err(|e| LovewatchError::Other(anyhow!("bundle task failed: {e}")))?
    }
}

/// Serialize `source_dir` into a zip archive at `output`.
///
/// Directories are not stored as entries; files whose relative path matches
/// `ignore` are skipped, as is the output file itself. Any traversal, read or
/// write failure aborts the build and leaves `output` untouched.
pub fn build_archive(source_dir: &Path, output: &Path, ignore: &IgnoreSpec) -> Result<BuildSummary> {
    info!(source = ?source_dir, output = ?output, "bundling project");

    write_archive(source_dir, output, ignore).map_err(|source| LovewatchError::Build {
        path: source_dir.to_path_buf(),
        source,
    })
}

fn write_archive(source_dir: &Path, output: &Path, ignore: &IgnoreSpec) -> anyhow::Result<BuildSummary> {
    let output_abs = absolute_output(output)?;
    let entries = collect_entries(source_dir, ignore, Some(&output_abs))?;

    let parent = output_abs
        .parent()
        .ok_or_else(|| anyhow!("output path {:?} has no parent directory", output))?;

    // Same directory as the target so the final rename stays on one filesystem.
    let mut tmp = tempfile::Builder::new()
        .prefix(".lovewatch-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .with_context(|| format!("creating temporary archive in {:?}", parent))?;

    {
        let mut zip = ZipWriter::new(tmp.as_file_mut());
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        for entry in entries.iter() {
            zip.start_file(entry.name.as_str(), options)
                .with_context(|| format!("adding archive entry {}", entry.name))?;
            let mut file = File::open(&entry.source)
                .with_context(|| format!("opening {:?}", entry.source))?;
            io::copy(&mut file, &mut zip)
                .with_context(|| format!("writing {:?} into archive", entry.source))?;
        }

        zip.finish().context("finalising archive")?;
    }

    tmp.as_file()
        .sync_all()
        .context("flushing temporary archive")?;
    let bytes = tmp.as_file().metadata()?.len();

    tmp.persist(&output_abs)
        .map_err(|e| e.error)
        .with_context(|| format!("replacing {:?}", output_abs))?;

    info!(output = ?output, entries = entries.len(), bytes, "project bundled");

    Ok(BuildSummary {
        output: output.to_path_buf(),
        entries: entries.into_iter().map(|e| e.name).collect(),
        bytes,
    })
}

/// Walk `source_dir` and list the files that belong in the archive, sorted by
/// entry name.
///
/// Symlinks to files are followed; symlinks to directories are skipped to
/// avoid cycles. `exclude`, when given, is an absolute path that is never
/// bundled (the archive itself usually lives inside the project).
pub fn collect_entries(
    source_dir: &Path,
    ignore: &IgnoreSpec,
    exclude: Option<&Path>,
) -> anyhow::Result<Vec<ArchiveEntry>> {
    let root = source_dir
        .canonicalize()
        .with_context(|| format!("resolving source directory {:?}", source_dir))?;

    let mut entries = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(dir) = stack.pop() {
        let listing = fs::read_dir(&dir).with_context(|| format!("reading directory {:?}", dir))?;

        for item in listing {
            let item = item.with_context(|| format!("reading directory {:?}", dir))?;
            let path = item.path();
            let rel = relative_str(&root, &path)
                .ok_or_else(|| anyhow!("{:?} is outside {:?}", path, root))?;

            if ignore.is_ignored(&rel) {
                debug!(path = %rel, "ignored");
                continue;
            }

            let file_type = item
                .file_type()
                .with_context(|| format!("inspecting {:?}", path))?;

            if file_type.is_dir() {
                stack.push(path);
                continue;
            }

            if file_type.is_symlink() {
                let target = fs::metadata(&path)
                    .with_context(|| format!("following symlink {:?}", path))?;
                if target.is_dir() {
                    debug!(path = %rel, "skipping symlinked directory");
                    continue;
                }
            }

            if exclude.is_some_and(|ex| ex == path) {
                continue;
            }

            entries.push(ArchiveEntry { source: path, name: rel });
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Absolute form of `output` with its parent canonicalised, so it compares
/// equal to the same file reached by walking the project.
fn absolute_output(output: &Path) -> anyhow::Result<PathBuf> {
    let file_name = output
        .file_name()
        .ok_or_else(|| anyhow!("output path {:?} does not name a file", output))?;

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let parent = parent
        .canonicalize()
        .with_context(|| format!("cannot create output file: directory {:?} is not accessible", parent))?;

    Ok(parent.join(file_name))
}
