// src/report.rs

use crate::analyzer::Ownership;
use crate::model::{AggregateCounters, CodeReport};
use crate::progress::{ProgressReporter, Step};
use crate::ranking::rank_files;
use std::fmt;

/// `part / whole * 100` rounded to two decimals, 0 when `whole` is 0.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

impl CodeReport {
    pub fn from_ownership(ownership: &Ownership, top: usize, progress: &dyn ProgressReporter) -> Self {
        progress.set_step(Step::Ranking);
        let counters = ownership.counters;
        let report = CodeReport {
            prc_new_code: percentage(counters.new, counters.lines),
            prc_rewrite_others_code: percentage(counters.rewrite_others, counters.lines),
            prc_rewrite_own_code: percentage(counters.rewrite_own, counters.lines),
            top_changed_files: rank_files(&ownership.files, top),
        };
        progress.set_progress(100);
        report
    }
}

pub fn render_json(report: &CodeReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn render_text(report: &CodeReport, counters: &AggregateCounters) -> String {
    TextReport { report, counters }.to_string()
}

struct TextReport<'a> {
    report: &'a CodeReport,
    counters: &'a AggregateCounters,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (report, counters) = (self.report, self.counters);
        writeln!(f, "Lines classified: {}", counters.lines)?;
        writeln!(
            f,
            "  new code:              {:>8}  ({:.2}%)",
            counters.new, report.prc_new_code
        )?;
        writeln!(
            f,
            "  rewrote others' code:  {:>8}  ({:.2}%)",
            counters.rewrite_others, report.prc_rewrite_others_code
        )?;
        writeln!(
            f,
            "  rewrote own code:      {:>8}  ({:.2}%)",
            counters.rewrite_own, report.prc_rewrite_own_code
        )?;

        if report.top_changed_files.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "Most changed files:")?;
        for (rank, file) in report.top_changed_files.iter().enumerate() {
            writeln!(
                f,
                "{:>3}. {} ({} patches, {} contributors)",
                rank + 1,
                file.name,
                file.patch_count,
                file.contributors.len()
            )?;
            for email in &file.contributors {
                writeln!(f, "       {}", email)?;
            }
        }
        Ok(())
    }
}
