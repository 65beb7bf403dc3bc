//! In-memory grant source for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FetchError, FetchResult};
use crate::traits::{GrantRecord, GrantSource};

/// In-memory implementation of [`GrantSource`].
///
/// The response is settable at any time (grants or an injected failure), an
/// optional delay simulates network latency for coalescing and staleness
/// tests, and a fetch counter lets tests assert how many fetches actually
/// reached the source.
#[derive(Debug)]
pub struct StaticGrantSource {
    response: RwLock<FetchResult<Vec<GrantRecord>>>,
    delay: RwLock<Option<Duration>>,
    fetch_count: AtomicU64,
}

impl Default for StaticGrantSource {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl StaticGrantSource {
    /// Creates a source that returns the given grant names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source = Self {
            response: RwLock::new(Ok(Vec::new())),
            delay: RwLock::new(None),
            fetch_count: AtomicU64::new(0),
        };
        source.set_grants(names);
        source
    }

    /// Replaces the grant list returned by subsequent fetches.
    pub fn set_grants<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = names.into_iter().map(GrantRecord::new).collect();
        *self
            .response
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Ok(records);
    }

    /// Makes subsequent fetches fail with the given error.
    pub fn set_failure(&self, error: FetchError) {
        *self
            .response
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Err(error);
    }

    /// Delays every fetch by the given duration.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap_or_else(PoisonError::into_inner) = Some(delay);
    }

    /// Number of fetches that actually reached this source.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrantSource for StaticGrantSource {
    async fn fetch_grants(&self) -> FetchResult<Vec<GrantRecord>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.response
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_configured_grants_and_counts_fetches() {
        let source = StaticGrantSource::new(["billing.read"]);
        assert_eq!(source.fetch_count(), 0);

        let records = source.fetch_grants().await.unwrap();
        assert_eq!(records, vec![GrantRecord::new("billing.read")]);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let source = StaticGrantSource::new(Vec::<String>::new());
        source.set_failure(FetchError::Server { status: 503 });
        assert_eq!(
            source.fetch_grants().await.unwrap_err(),
            FetchError::Server { status: 503 }
        );

        source.set_grants(["tickets.read"]);
        assert!(source.fetch_grants().await.is_ok());
    }
}
