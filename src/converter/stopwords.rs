//! Stopword set

use crate::ConfigError;
use std::collections::HashSet;
use std::path::Path;

/// Immutable set of tokens excluded from token documents
///
/// Loaded once when a converter is built and shared read-only by every
/// resolver it dispatches.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// Loads one stopword per line; surrounding whitespace and blank lines are ignored
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::MissingStopwords(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&content))
    }

    pub fn from_lines(content: &str) -> Self {
        content.lines().collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for StopwordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect();
        Self { words }
    }
}
