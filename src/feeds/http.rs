//! HTTP feed fetcher backed by `reqwest`.
//!
//! A single [`reqwest::Client`] with a fixed per-request timeout is shared by
//! every source; it is cheap to use concurrently.

use super::FeedSource;
use super::archive;
use super::parse::parse_feed;
use crate::error::FetchError;
use crate::models::{ArchiveWindow, RawFeedEntry};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
    archive_host: String,
}

impl HttpFeedFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration, archive_host: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            archive_host: archive_host.trim_end_matches('/').to_string(),
        })
    }

    pub fn archive_host(&self) -> &str {
        &self.archive_host
    }

    /// GET `url` and return the body of a 2xx response.
    #[instrument(level = "debug", skip(self))]
    async fn get_body(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let t0 = Instant::now();
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_request(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::from_request(url, e))?;

        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Downloaded"
        );
        Ok(body.to_vec())
    }

    /// Query the capture index, surfacing every failure.
    pub async fn try_list_snapshots(
        &self,
        endpoint: &str,
        window: &ArchiveWindow,
    ) -> Result<Vec<String>, FetchError> {
        let index_url = archive::snapshot_index_url(&self.archive_host, endpoint, window)?;
        let body = self.get_body(index_url.as_str()).await?;
        archive::parse_snapshot_index(index_url.as_str(), &body)
    }
}

impl FeedSource for HttpFeedFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_live(&self, endpoint: &str) -> Result<Vec<RawFeedEntry>, FetchError> {
        let body = self.get_body(endpoint).await?;
        let entries = parse_feed(&body);
        info!(count = entries.len(), "Fetched live feed");
        Ok(entries)
    }

    #[instrument(level = "info", skip(self, window), fields(from = %window.from_param(), to = %window.to_param()))]
    async fn list_archived_snapshots(&self, endpoint: &str, window: &ArchiveWindow) -> Vec<String> {
        match self.try_list_snapshots(endpoint, window).await {
            Ok(stamps) => {
                info!(count = stamps.len(), "Listed archived snapshots");
                stamps
            }
            Err(e) => {
                warn!(error = %e, "Archive lookup failed; treating as no snapshots");
                Vec::new()
            }
        }
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch_archived(
        &self,
        endpoint: &str,
        timestamp: &str,
    ) -> Result<Vec<RawFeedEntry>, FetchError> {
        let url = archive::replay_url(&self.archive_host, timestamp, endpoint);
        let body = self.get_body(&url).await?;
        let entries = parse_feed(&body);
        info!(count = entries.len(), "Fetched archived feed");
        Ok(entries)
    }
}
