// src/parser/hunk.rs

use crate::error::ParseError;
use crate::model::Hunk;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static HUNK_HEADER: OnceLock<Regex> = OnceLock::new();

fn hunk_header() -> &'static Regex {
    HUNK_HEADER.get_or_init(|| {
        Regex::new(r"^@@ -(\d+)(,\d+)? \+(\d+)(,\d+)? @@").expect("valid regex")
    })
}

/// Parses a unified diff hunk header such as `@@ -12,3 +12,0 @@ fn main()`.
/// Omitted counts default to 1.
pub fn parse_hunk_header(line: &str) -> Result<Hunk, ParseError> {
    let malformed = || ParseError::MalformedHunkHeader {
        header: line.to_string(),
    };
    let caps = hunk_header().captures(line).ok_or_else(malformed)?;

    let number = |idx: usize, default: u32| -> Result<u32, ParseError> {
        match caps.get(idx) {
            Some(m) => m
                .as_str()
                .trim_start_matches(',')
                .parse()
                .map_err(|_| malformed()),
            None => Ok(default),
        }
    };

    Ok(Hunk {
        old_start: number(1, 0)?,
        old_count: number(2, 1)?,
        new_start: number(3, 0)?,
        new_count: number(4, 1)?,
    })
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_header() {
        let hunk = parse_hunk_header("@@ -10,5 +12,7 @@").unwrap();
        assert_eq!(
            hunk,
            Hunk {
                old_start: 10,
                old_count: 5,
                new_start: 12,
                new_count: 7
            }
        );
    }

    #[test]
    fn omitted_counts_default_to_one() {
        let hunk = parse_hunk_header("@@ -3 +4 @@").unwrap();
        assert_eq!((hunk.old_count, hunk.new_count), (1, 1));
        assert_eq!((hunk.old_start, hunk.new_start), (3, 4));
    }

    #[test]
    fn mixed_omitted_counts() {
        let hunk = parse_hunk_header("@@ -0,0 +1 @@").unwrap();
        assert_eq!(hunk.old_count, 0);
        assert_eq!(hunk.new_count, 1);
    }

    #[test]
    fn ignores_section_heading() {
        let hunk = parse_hunk_header("@@ -1,2 +1,3 @@ impl Foo {").unwrap();
        assert_eq!(hunk.new_count, 3);
    }

    #[test]
    fn pure_deletion() {
        let hunk = parse_hunk_header("@@ -5,2 +4,0 @@").unwrap();
        assert_eq!(hunk.new_count, 0);
        assert_eq!(hunk.old_count, 2);
    }

    #[test]
    fn display_reconstructs_header() {
        for (a, b, c, d) in [(1, 2, 3, 4), (0, 0, 1, 3), (120, 1, 118, 0)] {
            let header = format!("@@ -{a},{b} +{c},{d} @@");
            let hunk = parse_hunk_header(&header).unwrap();
            assert_eq!(hunk.to_string(), header);
        }
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["@@ -a,b +c,d @@", "@@@ -1,2 -1,2 +1,3 @@@", "-1,2 +1,2", "@@ -1,2 +1,2"] {
            let err = parse_hunk_header(bad).unwrap_err();
            assert!(matches!(err, ParseError::MalformedHunkHeader { .. }), "{bad}");
        }
    }

    #[test]
    fn rejects_overflowing_numbers() {
        let err = parse_hunk_header("@@ -1,1 +99999999999,1 @@").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHunkHeader { .. }));
    }
}
