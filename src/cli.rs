//! Command-line interface definitions for News Harvest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment variables.

use crate::feeds::archive::DEFAULT_ARCHIVE_HOST;
use crate::feeds::http::DEFAULT_TIMEOUT;
use crate::models::{ArchiveWindow, IngestMode};
use crate::pipeline::{CoordinatorConfig, DEFAULT_CONCURRENCY};
use crate::utils::parse_compact_date;
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Fetch each feed as it is now
    Live,
    /// Replay archived captures of each feed from the Wayback Machine
    Historical,
}

/// Command-line arguments for the News Harvest application.
///
/// # Examples
///
/// ```sh
/// # Live run over the built-in sources, writing into ./data
/// news_harvest
///
/// # Replay January 2024 from the Wayback Machine with a 10 minute budget
/// news_harvest --mode historical --from 20240101 --to 20240131 --deadline-secs 600
///
/// # Custom sources, re-run every hour
/// news_harvest -s sources.yaml --interval-mins 60
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON and CSV files
    #[arg(short, long, env = "NEWS_OUTPUT_DIR", default_value = "data")]
    pub output_dir: String,

    /// Optional YAML file listing sources (name, url, country)
    #[arg(short, long, env = "NEWS_SOURCES")]
    pub sources: Option<String>,

    /// Ingestion mode
    #[arg(long, value_enum, env = "NEWS_MODE", default_value = "live")]
    pub mode: Mode,

    /// First day of the archive window (YYYYMMDD), historical mode only
    #[arg(long, default_value = "20240101")]
    pub from: String,

    /// Last day of the archive window (YYYYMMDD), historical mode only
    #[arg(long, default_value = "20250201")]
    pub to: String,

    /// Number of sources processed concurrently
    #[arg(short, long, env = "NEWS_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "NEWS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Retries for requests that time out
    #[arg(long, env = "NEWS_RETRIES", default_value_t = 2)]
    pub retries: usize,

    /// Abandon sources still running after this many seconds
    #[arg(long, env = "NEWS_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,

    /// Web archive host used in historical mode
    #[arg(long, env = "NEWS_ARCHIVE_HOST", default_value = DEFAULT_ARCHIVE_HOST)]
    pub archive_host: String,

    /// Repeat the run every N minutes instead of exiting
    #[arg(long, env = "NEWS_INTERVAL_MINS")]
    pub interval_mins: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "NEWS_LOG_FILE")]
    pub log_file: Option<String>,
}

impl Cli {
    /// Resolve the ingestion mode, validating the archive window.
    pub fn ingest_mode(&self) -> Result<IngestMode, String> {
        match self.mode {
            Mode::Live => Ok(IngestMode::Live),
            Mode::Historical => {
                let from = parse_compact_date(&self.from)
                    .map_err(|e| format!("invalid --from {:?}: {e}", self.from))?;
                let to = parse_compact_date(&self.to)
                    .map_err(|e| format!("invalid --to {:?}: {e}", self.to))?;
                if from > to {
                    return Err(format!("--from {} is after --to {}", self.from, self.to));
                }
                Ok(IngestMode::Historical(ArchiveWindow { from, to }))
            }
        }
    }

    /// Build the coordinator settings from mode, concurrency and deadline.
    ///
    /// # Errors
    ///
    /// Fails when the archive window is invalid (see [`Cli::ingest_mode`]).
    pub fn coordinator_config(&self) -> Result<CoordinatorConfig, String> {
        Ok(CoordinatorConfig {
            mode: self.ingest_mode()?,
            concurrency: self.concurrency.max(1),
            deadline: self.deadline_secs.map(Duration::from_secs),
        })
    }

    /// Per-request timeout for the HTTP client.
    ///
    /// # Returns
    ///
    /// `--timeout-secs` as a [`Duration`], never shorter than one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Pause between scheduled runs.
    ///
    /// # Returns
    ///
    /// * `Some(duration)` - when `--interval-mins` is set and non-zero;
    ///   very large values saturate instead of overflowing
    /// * `None` - single run, then exit
    pub fn interval(&self) -> Option<Duration> {
        self.interval_mins
            .filter(|m| *m > 0)
            .map(|m| Duration::from_secs(m.saturating_mul(60)))
    }
}
