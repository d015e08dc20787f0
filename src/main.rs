//! News Harvest command-line entry point.
//!
//! ```sh
//! news_harvest -o ./data
//! news_harvest --mode historical --from 20240101 --to 20250201
//! ```

use clap::Parser;
use itertools::Itertools;
use news_harvest::cli::Cli;
use news_harvest::feeds::{FeedSource, HttpFeedFetcher};
use news_harvest::language::{LanguageClassifier, WhatlangClassifier};
use news_harvest::models::SourceDescriptor;
use news_harvest::outputs::write_aggregates;
use news_harvest::pipeline::{Coordinator, SourceOutcome};
use news_harvest::retry::RetryFetch;
use news_harvest::sources::load_sources;
use news_harvest::utils::ensure_writable_dir;
use std::error::Error;
use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    init_tracing(args.log_file.as_deref())?;

    let start_time = Instant::now();
    info!("news_harvest starting up");
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let config = args.coordinator_config()?;
    let sources = load_sources(args.sources.as_deref()).await?;

    let fetcher = RetryFetch::new(
        HttpFeedFetcher::new(args.request_timeout(), &args.archive_host)?,
        args.retries,
        Duration::from_secs(1),
    );
    let coordinator = Coordinator::new(fetcher, WhatlangClassifier, config);

    let mut runs = 0usize;
    loop {
        runs += 1;
        run_once(&coordinator, &sources, &args.output_dir, runs).await;

        let Some(every) = args.interval() else { break };
        info!(next_in_secs = every.as_secs(), "Waiting for next scheduled run");
        tokio::select! {
            _ = tokio::time::sleep(every) => {}
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted; stopping scheduled runs");
                break;
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        runs,
        "Execution complete"
    );
    Ok(())
}

/// One full ingestion with a fresh dedup scope, followed by the writes.
#[instrument(level = "info", skip_all, fields(run = run))]
async fn run_once<F, C>(
    coordinator: &Coordinator<F, C>,
    sources: &[SourceDescriptor],
    output_dir: &str,
    run: usize,
) where
    F: FeedSource,
    C: LanguageClassifier,
{
    let (aggregates, report) = coordinator.run(sources).await;

    for failed in report
        .sources
        .iter()
        .filter(|r| r.outcome != SourceOutcome::Completed)
    {
        debug!(source = %failed.source, outcome = ?failed.outcome, "Source did not complete");
    }
    info!(%report, "Ingestion summary");
    info!(
        languages = %aggregates
            .by_language
            .iter()
            .map(|(lang, items)| format!("{lang}:{}", items.len()))
            .join(", "),
        "Language partitions"
    );

    let summary = write_aggregates(&aggregates, output_dir).await;
    if summary.is_complete() {
        info!(files = summary.written.len(), "News fetching complete");
    } else {
        error!(
            written = summary.written.len(),
            failed = summary.failed.len(),
            "Some output files could not be written"
        );
    }
}

/// Stderr by default; `--log-file` redirects the same format to a file.
fn init_tracing(log_file: Option<&str>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339());

    match log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }
    Ok(())
}
