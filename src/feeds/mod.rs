//! Feed retrieval, live and archival.
//!
//! The pipeline talks to the network only through the [`FeedSource`] trait so
//! that the coordinator can be driven by the real [`HttpFeedFetcher`], by the
//! retrying decorator in [`crate::retry`], or by an in-memory fake in tests.
//!
//! # Submodules
//!
//! - [`http`]: reqwest-backed implementation
//! - [`parse`]: feed document parsing with an explicit degrade-to-empty path
//! - [`archive`]: Wayback Machine index/replay addressing

pub mod archive;
pub mod http;
pub mod parse;

pub use http::HttpFeedFetcher;

use crate::error::FetchError;
use crate::models::{ArchiveWindow, RawFeedEntry};

/// Something that can produce raw feed entries for an endpoint.
pub trait FeedSource {
    /// Fetch the current state of a feed.
    async fn fetch_live(&self, endpoint: &str) -> Result<Vec<RawFeedEntry>, FetchError>;

    /// List capture timestamps of `endpoint` within `window`, oldest first as
    /// the archive returns them. Failures are absorbed into an empty list.
    async fn list_archived_snapshots(&self, endpoint: &str, window: &ArchiveWindow) -> Vec<String>;

    /// Fetch the feed as it was captured at `timestamp`.
    async fn fetch_archived(
        &self,
        endpoint: &str,
        timestamp: &str,
    ) -> Result<Vec<RawFeedEntry>, FetchError>;
}
