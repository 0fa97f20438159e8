// src/lib.rs

//! Line-ownership analysis of a repository's patch history.
//!
//! The pipeline reads the text of `git log -p --reverse -U0`, rebuilds the
//! commits it describes, replays their hunks oldest first to tell new code
//! from rewrites, and ranks the most changed files.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod model;
pub mod parser;
pub mod progress;
pub mod ranking;
pub mod report;
pub mod scanner;

pub use error::{Error, ParseError, Result};

use analyzer::Ownership;
use config::Config;
use history::ChronologicalCommits;
use model::CodeReport;
use progress::ProgressReporter;

/// Aggregates ownership over `history` and builds the report payload.
pub fn code_report(
    history: &ChronologicalCommits,
    config: &Config,
    progress: &dyn ProgressReporter,
) -> (CodeReport, Ownership) {
    let ownership = analyzer::analyze(history, &config.ignored(), progress);
    let report = CodeReport::from_ownership(&ownership, config.top_files, progress);
    (report, ownership)
}
