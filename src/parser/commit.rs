// src/parser/commit.rs

use super::diff::{parse_file_diff, GIT_DIFF_PREFIX};
use super::{COMMIT_PREFIX, DIFF_PREFIX};
use crate::error::ParseError;
use crate::model::{Author, Commit};
use crate::scanner::LineScanner;
use chrono::{DateTime, FixedOffset};
use std::io::BufRead;
use tracing::{debug, warn};

const AUTHOR_PREFIX: &str = "Author:";
const DATE_PREFIX: &str = "Date:";
const MESSAGE_INDENT: &str = "    ";

/// Formats tried in order after RFC 2822 and RFC 3339.
const DATE_FORMATS: &[&str] = &[
    // git's default: "Mon Jan 1 12:00:00 2024 +0100"
    "%a %b %d %H:%M:%S %Y %z",
    // --date=iso: "2024-01-01 12:00:00 +0100"
    "%Y-%m-%d %H:%M:%S %z",
];

/// Parses the next commit block.
///
/// Returns `Ok(None)` when no further `commit` line exists in the stream.
pub fn parse_commit<R: BufRead>(scanner: &mut LineScanner<R>) -> Result<Option<Commit>, ParseError> {
    match scanner.skip_until_starts_with(&[COMMIT_PREFIX]) {
        Ok(_) => {}
        Err(e) if e.is_exhausted() => return Ok(None),
        Err(e) => return Err(e),
    }

    let id = parse_hash(&scanner.take_line()?)?;
    let author = parse_author(&expect_line(scanner, AUTHOR_PREFIX)?)?;
    let date = parse_date(&expect_line(scanner, DATE_PREFIX)?)?;
    debug!("commit {} by {} at {}", id, author.email, date);

    let message = parse_message(scanner)?;

    let mut diffs = Vec::new();
    loop {
        match scanner.skip_until_starts_with(&[DIFF_PREFIX, COMMIT_PREFIX]) {
            Ok(s) if s.starts_with(&[GIT_DIFF_PREFIX]) => diffs.push(parse_file_diff(s)?),
            Ok(s) if s.starts_with(&[DIFF_PREFIX]) => {
                // diff --cc / --combined: merge output without single-parent numbering
                warn!("skipping {:?} in commit {}", s.current_line(), id);
                s.advance(1)?;
            }
            Ok(_) => break,
            Err(e) if e.is_exhausted() => break,
            Err(e) => return Err(e),
        }
    }

    Ok(Some(Commit {
        id,
        author,
        date,
        message,
        diffs,
    }))
}

/// Skips to the line starting with `prefix` and consumes it. Running into the
/// next commit or the end of the stream first is a grammar violation.
fn expect_line<R: BufRead>(scanner: &mut LineScanner<R>, prefix: &str) -> Result<String, ParseError> {
    let missing = |found: &str| ParseError::MissingExpectedToken {
        token: prefix.to_string(),
        found: found.to_string(),
    };

    match scanner.skip_until_starts_with(&[prefix, COMMIT_PREFIX, DIFF_PREFIX]) {
        Ok(s) if s.starts_with(&[prefix]) => s.take_line(),
        Ok(s) => Err(missing(s.current_line())),
        Err(e) if e.is_exhausted() => Err(missing("end of log")),
        Err(e) => Err(e),
    }
}

fn parse_hash(line: &str) -> Result<String, ParseError> {
    line.strip_prefix(COMMIT_PREFIX)
        .and_then(|rest| rest.split_whitespace().next())
        .map(String::from)
        .ok_or_else(|| ParseError::MissingExpectedToken {
            token: "commit hash".into(),
            found: line.to_string(),
        })
}

/// `Author: Jane Doe <jane@example.com>` into name and email.
pub(crate) fn parse_author(line: &str) -> Result<Author, ParseError> {
    let raw = line.strip_prefix(AUTHOR_PREFIX).unwrap_or(line).trim();
    let (name, email) = raw
        .rsplit_once(" <")
        .or_else(|| raw.strip_prefix('<').map(|email| ("", email)))
        .ok_or_else(|| ParseError::MissingExpectedToken {
            token: "<email>".into(),
            found: line.to_string(),
        })?;

    Ok(Author {
        name: name.trim().to_string(),
        email: email.trim_end_matches('>').trim().to_string(),
    })
}

/// Parses the value of a `Date:` line, dropping leading characters one at a
/// time until a known format matches.
pub(crate) fn parse_date(line: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let raw = line.strip_prefix(DATE_PREFIX).unwrap_or(line).trim();

    raw.char_indices()
        .find_map(|(idx, _)| parse_timestamp(&raw[idx..]))
        .ok_or_else(|| ParseError::UnparseableDate {
            raw: raw.to_string(),
        })
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        })
}

/// Collects the indented message lines that follow the `Date:` line.
fn parse_message<R: BufRead>(scanner: &mut LineScanner<R>) -> Result<String, ParseError> {
    let mut lines: Vec<String> = Vec::new();
    while scanner.has_next() && !scanner.starts_with(&[DIFF_PREFIX, COMMIT_PREFIX]) {
        let line = scanner.take_line()?;
        if let Some(text) = line.strip_prefix(MESSAGE_INDENT) {
            lines.push(text.to_string());
        } else if line.trim().is_empty() && !lines.is_empty() {
            lines.push(String::new());
        }
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    Ok(lines.join("\n"))
}
