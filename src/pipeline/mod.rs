//! The ingestion pipeline.
//!
//! ```text
//! Coordinator ──(≤ concurrency)──▶ process_source ──▶ FeedSource ──▶ normalize ──▶ IngestContext::admit
//! ```
//!
//! - [`coordinator`]: bounded fan-out over sources, deadline, panic containment
//! - [`processor`]: live and historical processing of one source
//! - [`context`]: the lock-guarded seen-titles set and aggregates
//! - [`report`]: per-source outcomes and run totals

pub mod context;
pub mod coordinator;
pub mod processor;
pub mod report;

pub use context::{Aggregates, IngestContext};
pub use coordinator::{Coordinator, CoordinatorConfig, DEFAULT_CONCURRENCY};
pub use processor::process_source;
pub use report::{RunReport, SourceOutcome, SourceReport, SourceTally};
