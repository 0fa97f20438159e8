// src/parser/diff.rs

use super::hunk::parse_hunk_header;
use super::{COMMIT_PREFIX, DIFF_PREFIX, HUNK_PREFIX};
use crate::error::ParseError;
use crate::model::FileDiff;
use crate::scanner::LineScanner;
use std::io::BufRead;
use tracing::debug;

pub(crate) const GIT_DIFF_PREFIX: &str = "diff --git ";

/// Parses one `diff --git` block, cursor on its first line.
///
/// Leaves the cursor on the next `diff`/`commit` boundary, or at the end of
/// the stream.
pub fn parse_file_diff<R: BufRead>(scanner: &mut LineScanner<R>) -> Result<FileDiff, ParseError> {
    let header = scanner.take_line()?;
    let (mut old_path, mut new_path) = paths_from_header(&header);

    // Extended header: everything up to the first hunk or the next block.
    while scanner.has_next() && !scanner.starts_with(&[HUNK_PREFIX, DIFF_PREFIX, COMMIT_PREFIX]) {
        let line = scanner.current_line();
        if let Some(path) = line.strip_prefix("--- ") {
            old_path = side_path(path);
        } else if let Some(path) = line.strip_prefix("+++ ") {
            new_path = side_path(path);
        } else if let Some(path) = line.strip_prefix("rename from ") {
            old_path = Some(unquote(path));
        } else if let Some(path) = line.strip_prefix("rename to ") {
            new_path = Some(unquote(path));
        } else if line.starts_with("new file mode") || line.starts_with("copy from ") {
            // Copies start a fresh history, the source file is untouched.
            old_path = None;
        } else if line.starts_with("deleted file mode") {
            new_path = None;
        }
        scanner.advance(1)?;
    }

    let mut patches = Vec::new();
    loop {
        match scanner.skip_until_starts_with(&[HUNK_PREFIX, DIFF_PREFIX, COMMIT_PREFIX]) {
            Ok(s) if s.starts_with(&[HUNK_PREFIX]) => {
                patches.push(parse_hunk_header(s.current_line())?);
                s.advance(1)?;
            }
            Ok(_) => break,
            Err(e) if e.is_exhausted() => break,
            Err(e) => return Err(e),
        }
    }

    debug!(
        "file diff {:?} -> {:?} ({} hunks)",
        old_path,
        new_path,
        patches.len()
    );
    Ok(FileDiff {
        old_path,
        new_path,
        patches,
    })
}

/// Best-effort paths from `diff --git a/<old> b/<new>`, used when the block
/// has no `---`/`+++` or rename lines (mode changes, binaries, empty files).
fn paths_from_header(header: &str) -> (Option<String>, Option<String>) {
    let rest = header.strip_prefix(GIT_DIFF_PREFIX).unwrap_or(header).trim_end();

    if rest.starts_with('"') {
        if let Some((old, new)) = split_quoted(rest) {
            return (Some(strip_prefix(&old).to_string()), Some(strip_prefix(&new).to_string()));
        }
    }

    // Unchanged paths split evenly, which survives spaces inside the path.
    if rest.len() % 2 == 1 {
        let half = rest.len() / 2;
        if rest.is_char_boundary(half) && rest.as_bytes()[half] == b' ' {
            let (old, new) = (&rest[..half], &rest[half + 1..]);
            if strip_prefix(old) == strip_prefix(new) {
                return (Some(strip_prefix(old).to_string()), Some(strip_prefix(new).to_string()));
            }
        }
    }

    match rest.split_once(" b/") {
        Some((old, new)) => (Some(strip_prefix(old).to_string()), Some(new.to_string())),
        None => (None, None),
    }
}

fn split_quoted(rest: &str) -> Option<(String, String)> {
    let end = closing_quote(rest)?;
    let (old, tail) = rest.split_at(end + 1);
    Some((unquote(old), unquote(tail.trim_start())))
}

fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, ch) in s.char_indices().skip(1) {
        match ch {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(idx),
            _ => escaped = false,
        }
    }
    None
}

/// `---`/`+++` operand to a repository path. `/dev/null` means the side is absent.
fn side_path(raw: &str) -> Option<String> {
    // git appends a tab when the path contains spaces
    let raw = unquote(raw.trim_end_matches('\t'));
    if raw == "/dev/null" {
        return None;
    }
    Some(strip_prefix(&raw).to_string())
}

/// Drops the two-character `a/` or `b/` prefix.
fn strip_prefix(path: &str) -> &str {
    match path.as_bytes() {
        [_, b'/', ..] => &path[2..],
        _ => path,
    }
}

/// Undoes git's C-style quoting, including octal escapes for non-ASCII bytes.
fn unquote(raw: &str) -> String {
    let inner = match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) => inner,
        None => return raw.to_string(),
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut iter = inner.bytes().peekable();
    while let Some(b) = iter.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        match iter.next() {
            Some(b'n') => bytes.push(b'\n'),
            Some(b't') => bytes.push(b'\t'),
            Some(d @ b'0'..=b'7') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match iter.peek() {
                        Some(&o @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(o - b'0');
                            iter.next();
                        }
                        _ => break,
                    }
                }
                bytes.push(value as u8);
            }
            Some(other) => bytes.push(other),
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hunk;

    fn parse(text: &str) -> (FileDiff, LineScanner<&[u8]>) {
        let mut scanner = LineScanner::from_text(text);
        let diff = parse_file_diff(&mut scanner).unwrap();
        (diff, scanner)
    }

    #[test]
    fn modification_with_hunks() {
        let (diff, scanner) = parse(
            "diff --git a/src/lib.rs b/src/lib.rs\n\
             index 1111111..2222222 100644\n\
             --- a/src/lib.rs\n\
             +++ b/src/lib.rs\n\
             @@ -3 +3 @@\n\
             -old\n\
             +new\n\
             @@ -10,2 +10,3 @@ fn main() {\n\
             -a\n\
             -b\n\
             +c\n\
             +d\n\
             +e\n\
             commit next\n",
        );
        assert_eq!(diff.old_path.as_deref(), Some("src/lib.rs"));
        assert_eq!(diff.new_path.as_deref(), Some("src/lib.rs"));
        assert_eq!(
            diff.patches,
            vec![
                Hunk { old_start: 3, old_count: 1, new_start: 3, new_count: 1 },
                Hunk { old_start: 10, old_count: 2, new_start: 10, new_count: 3 },
            ]
        );
        assert_eq!(scanner.current_line(), "commit next");
    }

    #[test]
    fn added_file_has_no_old_path() {
        let (diff, _) = parse(
            "diff --git a/f.txt b/f.txt\n\
             new file mode 100644\n\
             index 0000000..3333333\n\
             --- /dev/null\n\
             +++ b/f.txt\n\
             @@ -0,0 +1,3 @@\n\
             +1\n+2\n+3\n",
        );
        assert_eq!(diff.old_path, None);
        assert_eq!(diff.new_path.as_deref(), Some("f.txt"));
        assert_eq!(diff.patches.len(), 1);
    }

    #[test]
    fn deleted_file_keeps_old_path() {
        let (diff, _) = parse(
            "diff --git a/gone.txt b/gone.txt\n\
             deleted file mode 100644\n\
             --- a/gone.txt\n\
             +++ /dev/null\n\
             @@ -1,2 +0,0 @@\n\
             -x\n-y\n",
        );
        assert!(diff.is_deletion());
        assert_eq!(diff.effective_path(), Some("gone.txt"));
        assert_eq!(diff.patches[0].new_count, 0);
    }

    #[test]
    fn pure_rename_has_no_patches() {
        let (diff, scanner) = parse(
            "diff --git a/old.txt b/new.txt\n\
             similarity index 100%\n\
             rename from old.txt\n\
             rename to new.txt\n\
             diff --git a/other b/other\n",
        );
        assert!(diff.is_rename());
        assert_eq!(diff.old_path.as_deref(), Some("old.txt"));
        assert_eq!(diff.new_path.as_deref(), Some("new.txt"));
        assert!(diff.patches.is_empty());
        assert!(scanner.current_line().starts_with("diff --git a/other"));
    }

    #[test]
    fn rename_with_modification_keeps_hunks() {
        let (diff, _) = parse(
            "diff --git a/old.rs b/new.rs\n\
             similarity index 90%\n\
             rename from old.rs\n\
             rename to new.rs\n\
             index 1..2 100644\n\
             --- a/old.rs\n\
             +++ b/new.rs\n\
             @@ -4 +4 @@\n\
             -a\n\
             +b\n",
        );
        assert!(diff.is_rename());
        assert_eq!(diff.patches.len(), 1);
    }

    #[test]
    fn mode_change_uses_header_paths() {
        let (diff, _) = parse(
            "diff --git a/run me.sh b/run me.sh\n\
             old mode 100644\n\
             new mode 100755\n",
        );
        assert_eq!(diff.old_path.as_deref(), Some("run me.sh"));
        assert_eq!(diff.new_path.as_deref(), Some("run me.sh"));
        assert!(diff.patches.is_empty());
    }

    #[test]
    fn binary_file_has_no_patches() {
        let (diff, _) = parse(
            "diff --git a/logo.png b/logo.png\n\
             index 1..2 100644\n\
             Binary files a/logo.png and b/logo.png differ\n",
        );
        assert_eq!(diff.new_path.as_deref(), Some("logo.png"));
        assert!(diff.patches.is_empty());
    }

    #[test]
    fn quoted_and_tab_terminated_paths() {
        let (diff, _) = parse(
            "diff --git \"a/caf\\303\\251.txt\" \"b/caf\\303\\251.txt\"\n\
             --- \"a/caf\\303\\251.txt\"\n\
             +++ \"b/caf\\303\\251.txt\"\n\
             @@ -1 +1 @@\n",
        );
        assert_eq!(diff.new_path.as_deref(), Some("café.txt"));

        let (diff, _) = parse(
            "diff --git a/my file b/my file\n\
             --- a/my file\t\n\
             +++ b/my file\t\n\
             @@ -1 +1 @@\n",
        );
        assert_eq!(diff.new_path.as_deref(), Some("my file"));
    }

    #[test]
    fn malformed_hunk_header_propagates() {
        let mut scanner = LineScanner::from_text(
            "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1,x +1 @@\n",
        );
        let err = parse_file_diff(&mut scanner).unwrap_err();
        assert!(matches!(err, ParseError::MalformedHunkHeader { .. }));
    }

    #[test]
    fn header_paths_for_renamed_sides() {
        assert_eq!(
            paths_from_header("diff --git a/src/a.rs b/lib/b.rs"),
            (Some("src/a.rs".into()), Some("lib/b.rs".into()))
        );
    }
}
