// src/watch/relevance.rs

//! Which file changes are worth a rebuild at all.

use std::path::Path;

use crate::types::ChangeEvent;

/// Suffixes of the files a LÖVE game is built from: scripts, images, audio
/// and shaders.
pub const DEFAULT_EXTENSIONS: [&str; 7] = [".lua", ".png", ".jpg", ".ogg", ".wav", ".frag", ".vert"];

/// Fixed set of file suffixes that qualify a change as build-triggering.
///
/// Matching is a plain, case-sensitive suffix test on the full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevantExtensionSet {
    extensions: Vec<String>,
}

impl RelevantExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Pure predicate over the event's path. The operation kind is ignored
    /// here; the debounce gate looks at it.
    pub fn is_relevant(&self, event: &ChangeEvent) -> bool {
        self.is_relevant_path(event.path())
    }

    pub fn is_relevant_path(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }
}

impl Default for RelevantExtensionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}
