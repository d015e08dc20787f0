//! Data models for feed sources, raw feed entries and normalized news items.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`SourceDescriptor`]: One configured feed origin
//! - [`RawFeedEntry`]: An untrusted entry as produced by feed parsing
//! - [`NewsItem`]: The canonical record written to every output
//!
//! [`NewsItem`] field order is also the column order of the CSV outputs.

use serde::{Deserialize, Serialize};

/// Sentinel used for every optional field that a feed entry did not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Language assigned when the classifier could not decide.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// A configured news feed origin.
///
/// Loaded once at startup, either from the built-in table in
/// [`crate::sources`] or from a YAML file, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceDescriptor {
    /// Display name, e.g. `"BBC (UK)"`. Copied into every item from this source.
    pub name: String,
    /// The RSS/Atom endpoint.
    pub url: String,
    /// Country or region label, e.g. `"United Kingdom"`.
    pub country: String,
}

impl SourceDescriptor {
    /// Build a descriptor from borrowed parts.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name, unique within a run
    /// * `url` - Feed endpoint
    /// * `country` - Country or region label
    pub fn new(name: &str, url: &str, country: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            country: country.to_string(),
        }
    }
}

/// A feed entry as it came out of the parser. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedEntry {
    pub title: Option<String>,
    /// Publication date text as the feed carries it.
    pub published: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
}

/// A normalized article.
///
/// Every field holds a value: missing feed fields are replaced by
/// [`NOT_AVAILABLE`] and an undecidable language by [`UNKNOWN_LANGUAGE`].
/// The trimmed `title` is the deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub publication_date: String,
    /// Name of the [`SourceDescriptor`] that produced the item.
    pub source: String,
    pub country: String,
    pub summary: String,
    pub url: String,
    pub language: String,
}

/// Which feed state a run ingests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestMode {
    /// Fetch each endpoint once, as it is now.
    Live,
    /// Replay every archived capture of each endpoint within the window.
    Historical(ArchiveWindow),
}

/// Inclusive date window for archive lookups, rendered as `YYYYMMDD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveWindow {
    pub from: chrono::NaiveDate,
    pub to: chrono::NaiveDate,
}

impl ArchiveWindow {
    /// Start of the window as the archive's `from` query value (`YYYYMMDD`).
    pub fn from_param(&self) -> String {
        self.from.format("%Y%m%d").to_string()
    }

    /// End of the window as the archive's `to` query value (`YYYYMMDD`).
    pub fn to_param(&self) -> String {
        self.to.format("%Y%m%d").to_string()
    }
}
