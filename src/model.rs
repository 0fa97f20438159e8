// src/model.rs

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Commit hash as it appears after the `commit` keyword
pub type CommitId = String;

/// Parsed log, keyed by hash in the order commits appeared
pub type CommitLog = IndexMap<CommitId, Commit>;

/// Who wrote a commit. The email is the identity key, the name is display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// A single commit block of the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    pub author: Author,
    pub date: DateTime<FixedOffset>,
    #[serde(default)]
    pub message: String,
    pub diffs: Vec<FileDiff>,
}

/// Changes to one file within one commit.
///
/// A side that the log reports as `/dev/null` is `None`: an added file has no
/// `old_path`, a deleted file has no `new_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub patches: Vec<Hunk>,
}

impl FileDiff {
    /// Path the file's history is tracked under after this commit.
    /// Deleted files keep their old path so their history stays attributable.
    pub fn effective_path(&self) -> Option<&str> {
        self.new_path.as_deref().or(self.old_path.as_deref())
    }

    /// Both sides exist and differ.
    pub fn is_rename(&self) -> bool {
        matches!((&self.old_path, &self.new_path), (Some(old), Some(new)) if old != new)
    }

    pub fn is_deletion(&self) -> bool {
        self.new_path.is_none()
    }
}

/// One `@@ -oldStart,oldCount +newStart,newCount @@` region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
}

impl Hunk {
    /// Line numbers of the post-commit file covered by this hunk.
    /// Empty for pure deletions.
    pub fn new_lines(&self) -> std::ops::Range<u32> {
        self.new_start..self.new_start.saturating_add(self.new_count)
    }
}

/// A hunk tagged with the commit that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedHunk {
    pub hunk: Hunk,
    pub owner: Author,
    pub commit: CommitId,
}

/// A path change observed while aggregating
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub old: String,
    pub new: String,
}

/// Ownership history of one file, merged across renames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOwnershipRecord {
    pub name: String,
    /// Hunks in the order they were appended, which is commit order.
    pub patches: Vec<OwnedHunk>,
    pub renames: Vec<Rename>,
}

impl FileOwnershipRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patches: Vec::new(),
            renames: Vec::new(),
        }
    }
}

/// Line classification totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateCounters {
    pub lines: u64,
    pub new: u64,
    pub rewrite_own: u64,
    pub rewrite_others: u64,
}

impl AggregateCounters {
    pub fn merge(&mut self, other: AggregateCounters) {
        self.lines += other.lines;
        self.new += other.new;
        self.rewrite_own += other.rewrite_own;
        self.rewrite_others += other.rewrite_others;
    }
}

/// Entry of the most-changed files ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopChangedFile {
    pub name: String,
    pub contributors: Vec<String>,
    pub patch_count: usize,
}

/// Payload handed to the reporting side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeReport {
    pub prc_new_code: f64,
    pub prc_rewrite_others_code: f64,
    pub prc_rewrite_own_code: f64,
    pub top_changed_files: Vec<TopChangedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(old: Option<&str>, new: Option<&str>) -> FileDiff {
        FileDiff {
            old_path: old.map(String::from),
            new_path: new.map(String::from),
            patches: Vec::new(),
        }
    }

    #[test]
    fn deleted_file_keeps_old_path() {
        let deleted = diff(Some("gone.rs"), None);
        assert!(deleted.is_deletion());
        assert!(!deleted.is_rename());
        assert_eq!(deleted.effective_path(), Some("gone.rs"));
    }

    #[test]
    fn added_file_is_not_a_rename() {
        let added = diff(None, Some("fresh.rs"));
        assert!(!added.is_rename());
        assert_eq!(added.effective_path(), Some("fresh.rs"));
    }

    #[test]
    fn rename_requires_distinct_paths() {
        assert!(diff(Some("a.rs"), Some("b.rs")).is_rename());
        assert!(!diff(Some("a.rs"), Some("a.rs")).is_rename());
    }

    #[test]
    fn pure_deletion_hunk_covers_no_lines() {
        let hunk = Hunk {
            old_start: 4,
            old_count: 2,
            new_start: 3,
            new_count: 0,
        };
        assert!(hunk.new_lines().is_empty());
    }

    #[test]
    fn counters_merge() {
        let mut total = AggregateCounters {
            lines: 3,
            new: 3,
            ..Default::default()
        };
        total.merge(AggregateCounters {
            lines: 1,
            new: 0,
            rewrite_own: 0,
            rewrite_others: 1,
        });
        assert_eq!(total.lines, 4);
        assert_eq!(total.new, 3);
        assert_eq!(total.rewrite_others, 1);
    }
}
