// src/bundle/ignore.rs

/// Patterns left out of every bundle: VCS metadata, macOS folder metadata,
/// editor backup files and vim swap files.
pub const DEFAULT_IGNORE_PATTERNS: [&str; 4] = [".git", ".DS_Store", "~", ".swp"];

/// Ordered set of substring patterns.
///
/// A path is ignored if any pattern occurs anywhere in it. Paths are matched
/// relative to the project root with forward slashes, so the location of the
/// project on disk never influences what gets bundled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSpec {
    patterns: Vec<String>,
}

impl IgnoreSpec {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.patterns.iter().any(|p| rel_path.contains(p.as_str()))
    }
}

impl Default for IgnoreSpec {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS)
    }
}
