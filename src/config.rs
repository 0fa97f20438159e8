// src/config.rs

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Build artifacts whose churn says nothing about authorship.
pub const DEFAULT_IGNORED_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "composer.lock",
    "Cargo.lock",
    "Gemfile.lock",
    "poetry.lock",
    "Pipfile.lock",
    "go.sum",
];

pub const DEFAULT_TOP_FILES: usize = 10;

/// Settings read from an optional TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Substrings of paths excluded from ownership aggregation
    pub ignored_files: Vec<String>,
    /// Size of the most-changed files ranking
    pub top_files: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_files: DEFAULT_IGNORED_FILES.iter().map(|s| s.to_string()).collect(),
            top_files: DEFAULT_TOP_FILES,
        }
    }
}

impl Config {
    /// Loads `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies command-line overrides. `no_default_ignores` drops only the
    /// built-in lockfile patterns, patterns from a config file stay.
    pub fn apply_overrides(
        &mut self,
        extra_ignores: impl IntoIterator<Item = String>,
        no_default_ignores: bool,
        top: Option<usize>,
    ) {
        if no_default_ignores {
            self.ignored_files
                .retain(|pattern| !DEFAULT_IGNORED_FILES.contains(&pattern.as_str()));
        }
        self.ignored_files.extend(extra_ignores);
        if let Some(top) = top {
            self.top_files = top;
        }
    }

    pub fn ignored(&self) -> IgnoredFiles {
        IgnoredFiles::new(self.ignored_files.iter().cloned())
    }
}

/// Substring matcher for excluded paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredFiles {
    patterns: Vec<String>,
}

impl IgnoredFiles {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| path.contains(p.as_str()))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
