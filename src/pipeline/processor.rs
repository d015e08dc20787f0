//! Processing of a single source.
//!
//! Fetch → normalize → admit, in document order. Errors stop at this
//! boundary: they are logged with the source name and turned into a
//! [`SourceOutcome::Failed`], never propagated to sibling sources.

use super::context::IngestContext;
use super::report::{SourceOutcome, SourceTally};
use crate::error::FetchError;
use crate::feeds::FeedSource;
use crate::language::LanguageClassifier;
use crate::models::{ArchiveWindow, IngestMode, RawFeedEntry, SourceDescriptor};
use crate::normalize::normalize;
use crate::utils::truncate_for_log;
use tracing::{debug, error, info, instrument, warn};

enum Ingested {
    Entries,
    NoSnapshots,
}

/// Ingest everything `source` offers in `mode` into `ctx`.
#[instrument(level = "info", skip_all, fields(source = %source.name))]
pub async fn process_source<F, C>(
    fetcher: &F,
    classifier: &C,
    ctx: &IngestContext,
    source: &SourceDescriptor,
    mode: &IngestMode,
    tally: &SourceTally,
) -> SourceOutcome
where
    F: FeedSource,
    C: LanguageClassifier + ?Sized,
{
    let result = match mode {
        IngestMode::Live => ingest_live(fetcher, classifier, ctx, source, tally).await,
        IngestMode::Historical(window) => {
            ingest_archived(fetcher, classifier, ctx, source, window, tally).await
        }
    };

    match result {
        Ok(Ingested::Entries) => SourceOutcome::Completed,
        Ok(Ingested::NoSnapshots) => SourceOutcome::NoSnapshots,
        Err(e) => {
            error!(source = %source.name, url = %source.url, error = %e, "Source abandoned");
            SourceOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

async fn ingest_live<F, C>(
    fetcher: &F,
    classifier: &C,
    ctx: &IngestContext,
    source: &SourceDescriptor,
    tally: &SourceTally,
) -> Result<Ingested, FetchError>
where
    F: FeedSource,
    C: LanguageClassifier + ?Sized,
{
    info!(url = %source.url, "Fetching live feed");
    let entries = fetcher.fetch_live(&source.url).await?;
    admit_entries(entries, classifier, ctx, source, tally);
    Ok(Ingested::Entries)
}

async fn ingest_archived<F, C>(
    fetcher: &F,
    classifier: &C,
    ctx: &IngestContext,
    source: &SourceDescriptor,
    window: &ArchiveWindow,
    tally: &SourceTally,
) -> Result<Ingested, FetchError>
where
    F: FeedSource,
    C: LanguageClassifier + ?Sized,
{
    info!(url = %source.url, "Fetching historical data");
    let snapshots = fetcher.list_archived_snapshots(&source.url, window).await;
    if snapshots.is_empty() {
        warn!(source = %source.name, "No snapshots found");
        return Ok(Ingested::NoSnapshots);
    }

    for timestamp in &snapshots {
        info!(%timestamp, "Fetching snapshot");
        match fetcher.fetch_archived(&source.url, timestamp).await {
            Ok(entries) => {
                tally.snapshot_fetched();
                admit_entries(entries, classifier, ctx, source, tally);
            }
            Err(e) => {
                warn!(%timestamp, error = %e, "Snapshot unavailable; skipping");
            }
        }
    }
    Ok(Ingested::Entries)
}

fn admit_entries<C>(
    entries: Vec<RawFeedEntry>,
    classifier: &C,
    ctx: &IngestContext,
    source: &SourceDescriptor,
    tally: &SourceTally,
) where
    C: LanguageClassifier + ?Sized,
{
    for raw in entries {
        let item = normalize(raw, source, classifier);
        let title = truncate_for_log(&item.title, 80);
        let admitted = ctx.admit(item);
        tally.entry(admitted);
        if !admitted {
            debug!(%title, "Duplicate title skipped");
        }
    }
}
