// src/scanner.rs

//! Streaming line cursor over a patch log.
//!
//! Only the line under the cursor is held in memory, so arbitrarily long
//! histories can be scanned from a file handle.

use crate::error::ParseError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug)]
pub struct LineScanner<R> {
    reader: R,
    current: Option<String>,
    buf: Vec<u8>,
    line_number: usize,
    bytes_read: u64,
}

impl LineScanner<BufReader<File>> {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        LineScanner::new(BufReader::new(file))
    }
}

impl<'a> LineScanner<&'a [u8]> {
    pub fn from_text(text: &'a str) -> Self {
        // Reading from a slice cannot fail.
        LineScanner::new(text.as_bytes()).unwrap_or_else(|_| LineScanner::empty(text.as_bytes()))
    }

    fn empty(reader: &'a [u8]) -> Self {
        Self {
            reader,
            current: None,
            buf: Vec::new(),
            line_number: 0,
            bytes_read: 0,
        }
    }
}

impl<R: BufRead> LineScanner<R> {
    /// Wraps `reader` and loads the first line under the cursor.
    pub fn new(reader: R) -> std::io::Result<Self> {
        let mut scanner = Self {
            reader,
            current: None,
            buf: Vec::new(),
            line_number: 0,
            bytes_read: 0,
        };
        scanner.fill()?;
        Ok(scanner)
    }

    fn fill(&mut self) -> std::io::Result<()> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            self.current = None;
            return Ok(());
        }
        self.bytes_read += read as u64;
        self.line_number += 1;

        let mut end = self.buf.len();
        while end > 0 && matches!(self.buf[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        self.current = Some(String::from_utf8_lossy(&self.buf[..end]).into_owned());
        Ok(())
    }

    pub fn has_next(&self) -> bool {
        self.current.is_some()
    }

    /// The line under the cursor, or `""` once the stream is exhausted.
    pub fn current_line(&self) -> &str {
        self.current.as_deref().unwrap_or("")
    }

    /// 1-based number of the line under the cursor.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Bytes consumed from the underlying reader so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Consumes `n` lines. A no-op past the end of the stream.
    pub fn advance(&mut self, n: usize) -> Result<(), ParseError> {
        for _ in 0..n {
            if self.current.is_none() {
                break;
            }
            self.fill()?;
        }
        Ok(())
    }

    /// Takes the line under the cursor and moves past it.
    pub fn take_line(&mut self) -> Result<String, ParseError> {
        let line = self.current.take().unwrap_or_default();
        self.fill()?;
        Ok(line)
    }

    pub fn contains(&self, candidates: &[&str]) -> bool {
        self.current
            .as_deref()
            .is_some_and(|line| candidates.iter().any(|c| line.contains(c)))
    }

    pub fn starts_with(&self, candidates: &[&str]) -> bool {
        self.current
            .as_deref()
            .is_some_and(|line| candidates.iter().any(|c| line.starts_with(c)))
    }

    /// Advances until the current line starts with one of `candidates`.
    /// The current line itself is checked first.
    pub fn skip_until_starts_with(&mut self, candidates: &[&str]) -> Result<&mut Self, ParseError> {
        while self.has_next() {
            if self.starts_with(candidates) {
                return Ok(self);
            }
            self.fill()?;
        }
        Err(exhausted(candidates))
    }

    /// Same as [`skip_until_starts_with`](Self::skip_until_starts_with) with substring matching.
    pub fn skip_until_contains(&mut self, candidates: &[&str]) -> Result<&mut Self, ParseError> {
        while self.has_next() {
            if self.contains(candidates) {
                return Ok(self);
            }
            self.fill()?;
        }
        Err(exhausted(candidates))
    }
}

fn exhausted(candidates: &[&str]) -> ParseError {
    ParseError::Exhausted {
        expected: candidates.join(" | "),
    }
}
