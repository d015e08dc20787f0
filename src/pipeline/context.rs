//! Shared per-run aggregation state.
//!
//! One [`IngestContext`] is handed by reference to every concurrent source
//! processor. A single mutex covers the seen-titles set and both aggregates,
//! and it is never held across an `.await`.

use crate::dedup::Deduplicator;
use crate::models::NewsItem;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything a run admitted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Aggregates {
    /// All admitted items. Stable within a source, completion order across sources.
    pub items: Vec<NewsItem>,
    /// Admitted items grouped by language code, admission order within each.
    pub by_language: BTreeMap<String, Vec<NewsItem>>,
}

impl Aggregates {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Default)]
struct Inner {
    dedup: Deduplicator,
    aggregates: Aggregates,
}

/// Shared admission state for one dedup scope.
///
/// Sources running concurrently admit through `&IngestContext`; the title
/// set and the aggregates sit behind one mutex, so an item is either in the
/// set and in both collections or in none of them.
#[derive(Debug, Default)]
pub struct IngestContext {
    inner: Mutex<Inner>,
}

impl IngestContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every critical section leaves Inner consistent, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit `item` unless its title was seen before in this context.
    ///
    /// The dedup check and both appends happen under one lock acquisition.
    pub fn admit(&self, item: NewsItem) -> bool {
        let mut inner = self.lock();
        if !inner.dedup.admit(&item.title) {
            return false;
        }
        inner
            .aggregates
            .by_language
            .entry(item.language.clone())
            .or_default()
            .push(item.clone());
        inner.aggregates.items.push(item);
        true
    }

    pub fn admitted(&self) -> usize {
        self.lock().aggregates.items.len()
    }

    pub fn has_seen(&self, title: &str) -> bool {
        self.lock().dedup.contains(title)
    }

    /// Copy of the current aggregates, leaving the context usable.
    pub fn snapshot(&self) -> Aggregates {
        self.lock().aggregates.clone()
    }

    /// Consume the context and return what it admitted.
    pub fn into_aggregates(self) -> Aggregates {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .aggregates
    }
}
