// src/analyzer.rs

use crate::config::IgnoredFiles;
use crate::history::ChronologicalCommits;
use crate::model::*;
use crate::progress::{percent_of, ProgressReporter, Step};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// The complete results of the ownership aggregation
#[derive(Debug, Clone, Default)]
pub struct Ownership {
    /// Records in first-seen order (renamed files keep their slot)
    pub files: Vec<FileOwnershipRecord>,
    pub counters: AggregateCounters,
}

pub fn analyze(
    history: &ChronologicalCommits,
    ignored: &IgnoredFiles,
    progress: &dyn ProgressReporter,
) -> Ownership {
    progress.set_step(Step::Aggregating);

    let mut aggregator = OwnershipAggregator::new(ignored.clone());
    let total = history.len();
    for (i, commit) in history.iter().enumerate() {
        aggregator.process_commit(commit);
        progress.set_progress(percent_of(i + 1, total));
    }

    let ownership = aggregator.finish();
    info!(
        "classified {} lines across {} files",
        ownership.counters.lines,
        ownership.files.len()
    );
    ownership
}

/// Replays commits oldest first, collecting every file's hunks under its
/// current path.
#[derive(Debug, Default)]
pub struct OwnershipAggregator {
    ignored: IgnoredFiles,
    files: IndexMap<String, FileOwnershipRecord>,
}

impl OwnershipAggregator {
    pub fn new(ignored: IgnoredFiles) -> Self {
        Self {
            ignored,
            files: IndexMap::new(),
        }
    }

    /// Commits must be fed in chronological order.
    pub fn process_commit(&mut self, commit: &Commit) {
        for diff in &commit.diffs {
            self.process_diff(commit, diff);
        }
    }

    fn process_diff(&mut self, commit: &Commit, diff: &FileDiff) {
        let Some(path) = diff.effective_path() else {
            return;
        };
        if self.ignored.is_ignored(path) {
            debug!("ignoring {} in {}", path, commit.id);
            return;
        }

        if let (true, Some(old), Some(new)) = (diff.is_rename(), &diff.old_path, &diff.new_path) {
            self.rename(old, new);
        }

        if diff.patches.is_empty() {
            return;
        }

        let record = self
            .files
            .entry(path.to_string())
            .or_insert_with(|| FileOwnershipRecord::new(path));
        record.patches.extend(diff.patches.iter().map(|hunk| OwnedHunk {
            hunk: *hunk,
            owner: commit.author.clone(),
            commit: commit.id.clone(),
        }));
    }

    /// Moves the history recorded under `old` to `new`, keeping its position.
    fn rename(&mut self, old: &str, new: &str) {
        let Some((index, _, mut record)) = self.files.shift_remove_full(old) else {
            debug!("rename {} -> {} without prior history", old, new);
            return;
        };

        record.name = new.to_string();
        record.renames.push(Rename {
            old: old.to_string(),
            new: new.to_string(),
        });

        if let Some(replaced) = self.files.shift_remove(new) {
            warn!(
                "rename {} -> {} replaces existing history ({} patches)",
                old,
                new,
                replaced.patches.len()
            );
        }
        let index = index.min(self.files.len());
        self.files.shift_insert(index, new.to_string(), record);
    }

    /// Classifies every file's lines and sums the totals.
    pub fn finish(self) -> Ownership {
        let mut counters = AggregateCounters::default();
        for record in self.files.values() {
            counters.merge(classify(&record.patches));
        }
        Ownership {
            files: self.files.into_values().collect(),
            counters,
        }
    }
}

/// Classifies each line touched by `patches`, which must be in commit order.
///
/// The line map holds the last author email per line number and lives only
/// for this call.
pub fn classify(patches: &[OwnedHunk]) -> AggregateCounters {
    let mut line_map: HashMap<u32, &str> = HashMap::new();
    let mut counters = AggregateCounters::default();

    for patch in patches {
        let email = patch.owner.email.as_str();
        for line in patch.hunk.new_lines() {
            counters.lines += 1;
            match line_map.insert(line, email) {
                None => counters.new += 1,
                Some(previous) if previous == email => counters.rewrite_own += 1,
                Some(_) => counters.rewrite_others += 1,
            }
        }
    }

    counters
}
