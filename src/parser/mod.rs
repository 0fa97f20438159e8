// src/parser/mod.rs

//! Recursive-descent parser for `git log -p` output.
//!
//! The grammar nests strictly (commit > file diffs > hunks) and each level
//! has its own function: [`parse_commit`], [`parse_file_diff`] and
//! [`parse_hunk_header`]. [`LogParser`] drives them until the stream ends.

mod commit;
mod diff;
mod hunk;

pub use commit::parse_commit;
pub use diff::parse_file_diff;
pub use hunk::parse_hunk_header;

use crate::error::{Error, Result};
use crate::model::CommitLog;
use crate::progress::{NoProgress, ProgressReporter, Step};
use crate::scanner::LineScanner;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

pub(crate) const COMMIT_PREFIX: &str = "commit ";
pub(crate) const DIFF_PREFIX: &str = "diff ";
pub(crate) const HUNK_PREFIX: &str = "@@ ";

pub struct LogParser<'p, R> {
    scanner: LineScanner<R>,
    progress: &'p dyn ProgressReporter,
    total_bytes: Option<u64>,
}

impl<R: BufRead> LogParser<'static, R> {
    pub fn new(scanner: LineScanner<R>) -> Self {
        Self {
            scanner,
            progress: &NoProgress,
            total_bytes: None,
        }
    }
}

impl<'p, R: BufRead> LogParser<'p, R> {
    /// Reports parsing progress as the share of `total_bytes` consumed.
    pub fn with_progress<'q>(
        self,
        progress: &'q dyn ProgressReporter,
        total_bytes: u64,
    ) -> LogParser<'q, R> {
        LogParser {
            scanner: self.scanner,
            progress,
            total_bytes: Some(total_bytes),
        }
    }

    /// Parses every commit in the stream. A hash seen twice keeps the last block.
    pub fn parse(mut self) -> Result<CommitLog> {
        self.progress.set_step(Step::Parsing);
        let mut commits = CommitLog::new();
        let mut last_commit: Option<String> = None;

        while self.scanner.has_next() {
            let commit = match parse_commit(&mut self.scanner) {
                Ok(Some(commit)) => commit,
                Ok(None) => break,
                Err(source) => {
                    return Err(Error::Parse {
                        line: self.scanner.line_number(),
                        last_commit,
                        source,
                    })
                }
            };

            last_commit = Some(commit.id.clone());
            if let Some(previous) = commits.insert(commit.id.clone(), commit) {
                debug!("commit {} appeared twice, keeping the later block", previous.id);
            }
            self.report_progress();
        }

        self.progress.set_progress(100);
        info!("parsed {} commits", commits.len());
        Ok(commits)
    }

    fn report_progress(&self) {
        if let Some(total) = self.total_bytes.filter(|&t| t > 0) {
            let percent = (self.scanner.bytes_read().saturating_mul(100) / total).min(100);
            self.progress.set_progress(percent as u8);
        }
    }
}

/// Parses a log file from disk.
pub fn parse_log_file(path: &Path, progress: &dyn ProgressReporter) -> Result<CommitLog> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let total = std::fs::metadata(path).map_err(io_err)?.len();
    let scanner = LineScanner::open(path).map_err(io_err)?;
    LogParser::new(scanner).with_progress(progress, total).parse()
}

/// Parses log text held in memory.
pub fn parse_log_str(text: &str) -> Result<CommitLog> {
    LogParser::new(LineScanner::from_text(text)).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    const TWO_COMMITS: &str = "\
commit aaa
Author: alice <a@x.com>
Date:   Mon Jan 1 12:00:00 2024 +0000

    add f

diff --git a/f.txt b/f.txt
new file mode 100644
--- /dev/null
+++ b/f.txt
@@ -0,0 +1,3 @@
+1
+2
+3

commit bbb
Author: bob <b@x.com>
Date:   Tue Jan 2 12:00:00 2024 +0000

    touch f

diff --git a/f.txt b/f.txt
--- a/f.txt
+++ b/f.txt
@@ -2,1 +2,1 @@
-2
+two
";

    #[test]
    fn parses_commits_in_log_order() {
        let log = parse_log_str(TWO_COMMITS).unwrap();
        let ids: Vec<&str> = log.keys().map(String::as_str).collect();
        assert_eq!(ids, ["aaa", "bbb"]);
        assert_eq!(log["bbb"].author.email, "b@x.com");
        assert_eq!(log["bbb"].diffs[0].patches[0].new_start, 2);
    }

    #[test]
    fn empty_log_has_no_commits() {
        assert!(parse_log_str("").unwrap().is_empty());
        assert!(parse_log_str("\n\n   \n").unwrap().is_empty());
    }

    #[test]
    fn duplicate_hash_keeps_last_block() {
        let text = "\
commit aaa
Author: first <first@x.com>
Date: Mon Jan 1 12:00:00 2024 +0000

commit aaa
Author: second <second@x.com>
Date: Mon Jan 1 12:00:00 2024 +0000
";
        let log = parse_log_str(text).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log["aaa"].author.email, "second@x.com");
    }

    #[test]
    fn failure_carries_position_and_last_commit() {
        let text = "\
commit aaa
Author: alice <a@x.com>
Date: Mon Jan 1 12:00:00 2024 +0000

commit bbb
Author: bob <b@x.com>
Date: Mon Jan 1 12:00:00 2024 +0000

diff --git a/f b/f
--- a/f
+++ b/f
@@ -x +1 @@
";
        match parse_log_str(text).unwrap_err() {
            Error::Parse {
                line,
                last_commit,
                source,
            } => {
                assert_eq!(last_commit.as_deref(), Some("aaa"));
                assert_eq!(line, 12);
                assert!(matches!(source, ParseError::MalformedHunkHeader { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_date_aborts() {
        let text = "commit aaa\nAuthor: a <a@x.com>\nDate: whenever\n";
        let err = parse_log_str(text).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                source: ParseError::UnparseableDate { .. },
                ..
            }
        ));
    }
}
