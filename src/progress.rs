// src/progress.rs

use indicatif::ProgressBar;
use std::cell::Cell;

/// Pipeline stage being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Exporting,
    Parsing,
    Aggregating,
    Ranking,
}

impl Step {
    pub fn label(self) -> &'static str {
        match self {
            Step::Exporting => "Exporting history",
            Step::Parsing => "Parsing log",
            Step::Aggregating => "Aggregating ownership",
            Step::Ranking => "Ranking files",
        }
    }
}

/// Optional side channel for coarse progress milestones.
pub trait ProgressReporter {
    fn set_step(&self, step: Step);
    /// `percent` is within `0..=100`.
    fn set_progress(&self, percent: u8);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn set_step(&self, _step: Step) {}
    fn set_progress(&self, _percent: u8) {}
}

impl ProgressReporter for ProgressBar {
    fn set_step(&self, step: Step) {
        self.set_length(100);
        self.set_position(0);
        self.set_message(step.label());
    }

    fn set_progress(&self, percent: u8) {
        self.set_position(u64::from(percent.min(100)));
    }
}

/// Forwards only changes of step or percentage to the inner reporter.
pub struct Milestones<'a> {
    inner: &'a dyn ProgressReporter,
    step: Cell<Option<Step>>,
    percent: Cell<Option<u8>>,
}

impl<'a> Milestones<'a> {
    pub fn new(inner: &'a dyn ProgressReporter) -> Self {
        Self {
            inner,
            step: Cell::new(None),
            percent: Cell::new(None),
        }
    }
}

impl ProgressReporter for Milestones<'_> {
    fn set_step(&self, step: Step) {
        if self.step.get() != Some(step) {
            self.step.set(Some(step));
            self.percent.set(None);
            self.inner.set_step(step);
        }
    }

    fn set_progress(&self, percent: u8) {
        if self.percent.get() != Some(percent) {
            self.percent.set(Some(percent));
            self.inner.set_progress(percent);
        }
    }
}

/// Integer percentage of `done` over `total`, 100 when there is nothing to do.
pub fn percent_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done.min(total) * 100) / total) as u8
}
