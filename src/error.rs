// src/error.rs

use std::path::PathBuf;

/// Result type used by the parsing and aggregation pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while scanning a single construct of the log.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The stream ended before any of the expected boundaries showed up.
    /// Loops use this to detect that there are no more commits or diffs.
    #[error("reached end of log while looking for {expected}")]
    Exhausted { expected: String },

    #[error("malformed hunk header: {header:?}")]
    MalformedHunkHeader { header: String },

    #[error("unparseable commit date: {raw:?}")]
    UnparseableDate { raw: String },

    #[error("expected {token:?} but found {found:?}")]
    MissingExpectedToken { token: String, found: String },

    #[error("failed to read log: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, ParseError::Exhausted { .. })
    }
}

/// Errors surfaced to callers of the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The log grammar was violated. `line` is the 1-based scanner position.
    #[error(
        "log parse failed at line {line} (last parsed commit: {}): {source}",
        .last_commit.as_deref().unwrap_or("none")
    )]
    Parse {
        line: usize,
        last_commit: Option<String>,
        #[source]
        source: ParseError,
    },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write log: {0}")]
    Write(#[source] std::io::Error),

    #[error("invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}
