//! # News Harvest
//!
//! An ingestion pipeline for syndicated news feeds from many national
//! sources. Feeds are fetched concurrently, each entry is normalized into a
//! [`models::NewsItem`], deduplicated by title across all sources,
//! classified by language, and written out as JSON and CSV, both as one
//! overall collection and as one partition per language.
//!
//! ## Modes
//!
//! - **Live**: every feed is fetched once, as it is now.
//! - **Historical**: the Wayback Machine capture index is queried for each
//!   feed within a date window and every capture is replayed in order.
//!
//! ## Architecture
//!
//! 1. **Sources**: built-in table or YAML file ([`sources`])
//! 2. **Fetching**: [`feeds::FeedSource`], with bounded retry ([`retry`])
//! 3. **Normalizing**: [`normalize`] + [`language`]
//! 4. **Admission**: [`dedup`] inside the shared [`pipeline::IngestContext`]
//! 5. **Fan-out**: [`pipeline::Coordinator`], at most N sources at a time
//! 6. **Output**: [`outputs`]
//!
//! A failing source is logged and abandoned without affecting the others; a
//! run always completes with whatever was admitted, plus a
//! [`pipeline::RunReport`].

pub mod cli;
pub mod dedup;
pub mod error;
pub mod feeds;
pub mod language;
pub mod models;
pub mod normalize;
pub mod outputs;
pub mod pipeline;
pub mod retry;
pub mod sources;
pub mod utils;
