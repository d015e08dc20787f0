//! Bounded retry with exponential backoff for timed-out fetches.
//!
//! [`RetryFetch`] wraps any [`FeedSource`] and repeats `fetch_live` and
//! `fetch_archived` when, and only when, they fail with
//! [`FetchError::Timeout`]. HTTP status errors and other network failures
//! are returned on the first attempt. The archive lookup is passed through
//! untouched because it never fails.
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use crate::error::FetchError;
use crate::feeds::FeedSource;
use crate::models::{ArchiveWindow, RawFeedEntry};
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, warn};

pub struct RetryFetch<T> {
    inner: T,
    /// Extra attempts after the first; zero disables retrying.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: FeedSource,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    async fn with_retry<F, Fut>(&self, what: &str, url: &str, mut op: F) -> Result<Vec<RawFeedEntry>, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Vec<RawFeedEntry>, FetchError>>,
    {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match op().await {
                Ok(entries) => return Ok(entries),
                Err(e) if e.is_timeout() => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        if self.max_retries > 0 {
                            error!(
                                what,
                                url,
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_total = total_dt.as_millis() as u64,
                                "Fetch still timing out; giving up"
                            );
                        }
                        return Err(e);
                    }

                    let delay = backoff_delay(self.base_delay, self.max_delay, attempt)
                        + Duration::from_millis(rng().random_range(0..=250));

                    warn!(
                        what,
                        url,
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        "Fetch timed out; backing off"
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based), without jitter.
fn backoff_delay(base: Duration, max: Duration, attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(31) as u32;
    base.saturating_mul(1u32 << shift).min(max)
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FeedSource for RetryFetch<T>
where
    T: FeedSource,
{
    async fn fetch_live(&self, endpoint: &str) -> Result<Vec<RawFeedEntry>, FetchError> {
        self.with_retry("live", endpoint, || self.inner.fetch_live(endpoint))
            .await
    }

    async fn list_archived_snapshots(&self, endpoint: &str, window: &ArchiveWindow) -> Vec<String> {
        self.inner.list_archived_snapshots(endpoint, window).await
    }

    async fn fetch_archived(
        &self,
        endpoint: &str,
        timestamp: &str,
    ) -> Result<Vec<RawFeedEntry>, FetchError> {
        self.with_retry("archived", endpoint, || {
            self.inner.fetch_archived(endpoint, timestamp)
        })
        .await
    }
}
