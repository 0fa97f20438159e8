// src/ranking.rs

use crate::model::{FileOwnershipRecord, TopChangedFile};
use indexmap::IndexSet;

/// The `top` files with the most patches. Ties keep their input order.
pub fn rank_files(records: &[FileOwnershipRecord], top: usize) -> Vec<TopChangedFile> {
    let mut ranked: Vec<&FileOwnershipRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.patches.len().cmp(&a.patches.len()));

    ranked
        .into_iter()
        .take(top)
        .map(|record| {
            let contributors: IndexSet<&str> = record
                .patches
                .iter()
                .map(|patch| patch.owner.email.as_str())
                .collect();
            TopChangedFile {
                name: record.name.clone(),
                contributors: contributors.into_iter().map(String::from).collect(),
                patch_count: record.patches.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, Hunk, OwnedHunk};

    fn record(name: &str, owners: &[&str]) -> FileOwnershipRecord {
        let mut record = FileOwnershipRecord::new(name);
        record.patches = owners
            .iter()
            .map(|email| OwnedHunk {
                hunk: Hunk {
                    old_start: 1,
                    old_count: 1,
                    new_start: 1,
                    new_count: 1,
                },
                owner: Author {
                    name: String::new(),
                    email: email.to_string(),
                },
                commit: "c".into(),
            })
            .collect();
        record
    }

    #[test]
    fn sorts_by_patch_count_and_dedups_contributors() {
        let records = [
            record("a", &["x@x"]),
            record("b", &["y@x", "x@x", "y@x"]),
            record("c", &["z@x", "z@x"]),
        ];
        let top = rank_files(&records, 10);
        let names: Vec<&str> = top.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
        assert_eq!(top[0].contributors, ["y@x", "x@x"]);
        assert_eq!(top[0].patch_count, 3);
        assert_eq!(top[1].contributors, ["z@x"]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let records = [record("first", &["a"]), record("second", &["b"]), record("third", &["c", "c"])];
        let top = rank_files(&records, 10);
        let names: Vec<&str> = top.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["third", "first", "second"]);
    }

    #[test]
    fn truncates_to_top() {
        let records: Vec<_> = (0..15).map(|i| record(&format!("f{i}"), &["a"])).collect();
        assert_eq!(rank_files(&records, 10).len(), 10);
        assert!(rank_files(&records, 0).is_empty());
        assert!(rank_files(&[], 10).is_empty());
    }
}
