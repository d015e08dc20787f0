//! Concurrent fan-out of source processing.
//!
//! Sources are driven through `buffer_unordered`, so at most
//! `concurrency` of them are in flight and the rest wait for a free slot.
//! `collect()` only resolves once every source has produced its report:
//! nothing is dispatched without being awaited.

use super::context::{Aggregates, IngestContext};
use super::processor::process_source;
use super::report::{RunReport, SourceOutcome, SourceReport, SourceTally};
use crate::feeds::FeedSource;
use crate::language::LanguageClassifier;
use crate::models::{IngestMode, SourceDescriptor};
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};

pub const DEFAULT_CONCURRENCY: usize = 5;

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub mode: IngestMode,
    /// Maximum number of sources processed at once; values below 1 act as 1.
    pub concurrency: usize,
    /// Optional run deadline measured from the start of the run.
    pub deadline: Option<Duration>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            mode: IngestMode::Live,
            concurrency: DEFAULT_CONCURRENCY,
            deadline: None,
        }
    }
}

#[derive(Debug)]
pub struct Coordinator<F, C> {
    fetcher: F,
    classifier: C,
    config: CoordinatorConfig,
}

impl<F, C> Coordinator<F, C>
where
    F: FeedSource,
    C: LanguageClassifier,
{
    pub fn new(fetcher: F, classifier: C, config: CoordinatorConfig) -> Self {
        Self {
            fetcher,
            classifier,
            config,
        }
    }

    /// Ingest all `sources` with a fresh dedup scope.
    pub async fn run(&self, sources: &[SourceDescriptor]) -> (Aggregates, RunReport) {
        let ctx = IngestContext::new();
        let report = self.run_in(&ctx, sources).await;
        (ctx.into_aggregates(), report)
    }

    /// Ingest all `sources` into an existing context, continuing its dedup scope.
    #[instrument(level = "info", skip_all, fields(sources = sources.len(), concurrency = self.config.concurrency))]
    pub async fn run_in(&self, ctx: &IngestContext, sources: &[SourceDescriptor]) -> RunReport {
        let started = Instant::now();
        let deadline = self.config.deadline.map(|d| started + d);
        let concurrency = self.config.concurrency.max(1);

        info!(mode = ?self.config.mode, "Starting ingestion run");

        let reports: Vec<SourceReport> = stream::iter(sources)
            .map(|source| self.dispatch(ctx, source, deadline))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let report = RunReport {
            sources: reports,
            elapsed: started.elapsed(),
        };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled(),
            admitted = report.admitted(),
            "Ingestion run finished"
        );
        report
    }

    /// Process one source, containing panics and enforcing the deadline.
    async fn dispatch(
        &self,
        ctx: &IngestContext,
        source: &SourceDescriptor,
        deadline: Option<Instant>,
    ) -> SourceReport {
        let tally = SourceTally::default();

        if deadline.is_some_and(|at| Instant::now() >= at) {
            warn!(source = %source.name, "Run deadline passed before source started");
            return tally.report(&source.name, SourceOutcome::Cancelled);
        }

        let work = AssertUnwindSafe(process_source(
            &self.fetcher,
            &self.classifier,
            ctx,
            source,
            &self.config.mode,
            &tally,
        ))
        .catch_unwind();

        let finished = match deadline {
            Some(at) => tokio::time::timeout_at(at, work).await.ok(),
            None => Some(work.await),
        };

        let outcome = match finished {
            Some(Ok(outcome)) => outcome,
            Some(Err(_panic)) => {
                error!(source = %source.name, "Source processing panicked; abandoning source");
                SourceOutcome::Failed {
                    error: "panicked during processing".to_string(),
                }
            }
            None => {
                warn!(source = %source.name, "Run deadline reached; source cancelled");
                SourceOutcome::Cancelled
            }
        };

        tally.report(&source.name, outcome)
    }
}
