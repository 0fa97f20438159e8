// src/history.rs

//! Explicitly ordered commit sequences.
//!
//! Ownership attribution is only meaningful when commits are replayed oldest
//! first. The aggregator takes a [`ChronologicalCommits`] rather than a plain
//! collection so callers have to state how that order was obtained.

use crate::model::{Commit, CommitLog};

/// How the commits of a parsed log relate to chronological order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOrder {
    /// The log was produced oldest first (`git log --reverse`)
    #[default]
    AsLogged,
    /// The log was produced newest first (plain `git log`)
    Reversed,
    /// Order unknown, sort by author date
    ByDate,
}

/// Commits guaranteed to be oldest first
#[derive(Debug, Clone, Default)]
pub struct ChronologicalCommits {
    commits: Vec<Commit>,
}

impl ChronologicalCommits {
    pub fn from_log(log: CommitLog, order: LogOrder) -> Self {
        let commits: Vec<Commit> = log.into_values().collect();
        match order {
            LogOrder::AsLogged => Self::oldest_first(commits),
            LogOrder::Reversed => Self::newest_first(commits),
            LogOrder::ByDate => Self::sorted_by_date(commits),
        }
    }

    /// Trusts that `commits` is already oldest first.
    pub fn oldest_first(commits: Vec<Commit>) -> Self {
        Self { commits }
    }

    pub fn newest_first(mut commits: Vec<Commit>) -> Self {
        commits.reverse();
        Self { commits }
    }

    /// Stable sort, so commits sharing a timestamp keep their relative order.
    pub fn sorted_by_date(mut commits: Vec<Commit>) -> Self {
        commits.sort_by_key(|commit| commit.date);
        Self { commits }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Commit> {
        self.commits.iter()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChronologicalCommits {
    type Item = &'a Commit;
    type IntoIter = std::slice::Iter<'a, Commit>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.iter()
    }
}
