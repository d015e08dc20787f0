//! Per-source and per-run outcome accounting.

use itertools::Itertools;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How processing of one source ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Every fetch the source needed was attempted.
    Completed,
    /// Historical mode found no captures for the endpoint.
    NoSnapshots,
    /// The source was abandoned; items admitted before the error are kept.
    Failed { error: String },
    /// The run deadline passed before the source finished.
    Cancelled,
}

impl SourceOutcome {
    /// Short snake_case name used in the run summary.
    pub fn label(&self) -> &'static str {
        match self {
            SourceOutcome::Completed => "completed",
            SourceOutcome::NoSnapshots => "no_snapshots",
            SourceOutcome::Failed { .. } => "failed",
            SourceOutcome::Cancelled => "cancelled",
        }
    }
}

/// Counters updated while a source is processed. They live outside the
/// processing future so they survive its cancellation.
#[derive(Debug, Default)]
pub struct SourceTally {
    entries: AtomicUsize,
    admitted: AtomicUsize,
    duplicates: AtomicUsize,
    snapshots: AtomicUsize,
}

impl SourceTally {
    /// Count one normalized entry and whether it was admitted.
    pub fn entry(&self, admitted: bool) {
        self.entries.fetch_add(1, Ordering::Relaxed);
        if admitted {
            self.admitted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot_fetched(&self) {
        self.snapshots.fetch_add(1, Ordering::Relaxed);
    }

    /// Freeze the counters into a [`SourceReport`] with the final `outcome`.
    pub fn report(&self, source: &str, outcome: SourceOutcome) -> SourceReport {
        SourceReport {
            source: source.to_string(),
            outcome,
            entries: self.entries.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            snapshots: self.snapshots.load(Ordering::Relaxed),
        }
    }
}

/// Counters and outcome for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: String,
    pub outcome: SourceOutcome,
    /// Entries seen across all fetched documents.
    pub entries: usize,
    pub admitted: usize,
    /// Entries rejected because their title was already admitted.
    pub duplicates: usize,
    /// Archived captures fetched (historical mode).
    pub snapshots: usize,
}

/// Result of one ingestion run, logged at the end of every run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// One report per source, in completion order.
    pub sources: Vec<SourceReport>,
    pub elapsed: Duration,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&SourceOutcome) -> bool) -> usize {
        self.sources.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Sources that completed, including those with no archived captures.
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, SourceOutcome::Completed | SourceOutcome::NoSnapshots))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SourceOutcome::Failed { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, SourceOutcome::Cancelled))
    }

    /// Items admitted across all sources.
    pub fn admitted(&self) -> usize {
        self.sources.iter().map(|r| r.admitted).sum()
    }

    pub fn get(&self, source: &str) -> Option<&SourceReport> {
        self.sources.iter().find(|r| r.source == source)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let by_outcome = self
            .sources
            .iter()
            .counts_by(|r| r.outcome.label())
            .into_iter()
            .sorted()
            .map(|(label, n)| format!("{label}={n}"))
            .join(" ");
        write!(
            f,
            "{} sources ({}), {} items admitted in {:.1}s",
            self.sources.len(),
            by_outcome,
            self.admitted(),
            self.elapsed.as_secs_f64()
        )
    }
}
