#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a throwaway project tree on disk.
pub struct ProjectTreeBuilder {
    files: Vec<(PathBuf, Vec<u8>)>,
    dirs: Vec<PathBuf>,
}

impl ProjectTreeBuilder {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            dirs: Vec::new(),
        }
    }

    /// A tree with a `main.lua`, like `love .` expects.
    pub fn minimal_game() -> Self {
        Self::new().file("main.lua", "function love.draw() end\n")
    }

    pub fn file(mut self, rel: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files.push((PathBuf::from(rel), contents.into()));
        self
    }

    pub fn dir(mut self, rel: &str) -> Self {
        self.dirs.push(PathBuf::from(rel));
        self
    }

    pub fn build(self) -> ProjectTree {
        let dir = tempfile::tempdir().expect("Failed to create temp project dir");
        for rel in self.dirs {
            fs::create_dir_all(dir.path().join(rel)).expect("Failed to create dir");
        }
        for (rel, contents) in self.files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("Failed to create parent dir");
            }
            fs::write(path, contents).expect("Failed to write file");
        }
        ProjectTree { dir }
    }
}

impl Default for ProjectTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A project tree that is deleted when dropped.
pub struct ProjectTree {
    dir: TempDir,
}

impl ProjectTree {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, contents).expect("Failed to write file");
    }
}
