//! Title-based deduplication.
//!
//! Titles are compared by exact string equality after the trimming done in
//! [`crate::normalize`]; there is no case folding or fuzzy matching. The set
//! is not synchronized itself: [`crate::pipeline::IngestContext`] holds it
//! under the same lock as the aggregates so that check-and-append is atomic.

use std::collections::HashSet;

/// Set of titles admitted so far; the first occurrence of a title wins.
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `title`, returning `false` if it was already admitted.
    pub fn admit(&mut self, title: &str) -> bool {
        if self.seen.contains(title) {
            return false;
        }
        self.seen.insert(title.to_string())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.seen.contains(title)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
