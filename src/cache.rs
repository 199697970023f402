//! Get-or-create index cache keyed by `"{owner/repo}:{branch}"`.
//!
//! Locking is per key: the key map itself is only held long enough to look up
//! or insert a slot, while each slot's async mutex is held across the full
//! load. Concurrent requests for the same key therefore perform exactly one
//! load, and cold loads for distinct repositories proceed in parallel instead
//! of serializing behind one process-wide lock.
//!
//! Successful loads are cached for the process lifetime — no eviction, no TTL,
//! no refresh when the branch advances. Failed loads are not cached, so a
//! later request retries from scratch.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::index::RepoIndex;
use crate::loader::{LoadError, RepoLoader};

type Slot = Arc<tokio::sync::Mutex<Option<Arc<RepoIndex>>>>;

pub struct IndexCache {
    loader: Box<dyn RepoLoader>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl IndexCache {
    pub fn new(loader: Box<dyn RepoLoader>) -> Self {
        Self {
            loader,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached index for `repo:branch`, loading it on first use.
    pub async fn get_or_create(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<Arc<RepoIndex>, LoadError> {
        let key = format!("{repo}:{branch}");
        let slot = {
            let mut slots = self.slots.lock();
            slots.entry(key).or_default().clone()
        };

        let mut guard = slot.lock().await;
        if let Some(index) = guard.as_ref() {
            return Ok(index.clone());
        }

        let index = self.loader.load(repo, branch).await?;
        *guard = Some(index.clone());
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Loader that counts invocations and returns an empty index, with an
    /// optional artificial delay to widen race windows.
    struct CountingLoader {
        calls: AtomicUsize,
        delay: Duration,
        fail_first: AtomicUsize,
    }

    impl CountingLoader {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail_first: AtomicUsize::new(0),
            }
        }

        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new()
            }
        }

        fn failing_first(n: usize) -> Self {
            Self {
                fail_first: AtomicUsize::new(n),
                ..Self::new()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RepoLoader for CountingLoader {
        async fn load(&self, _repo: &str, _branch: &str) -> Result<Arc<RepoIndex>, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail_first.load(Ordering::SeqCst) > 0 {
                self.fail_first.fetch_sub(1, Ordering::SeqCst);
                return Err(LoadError::Upstream(anyhow!("simulated outage")));
            }
            Ok(Arc::new(RepoIndex::new(Vec::new())))
        }
    }

    fn cache_with(loader: Arc<CountingLoader>) -> Arc<IndexCache> {
        struct Forward(Arc<CountingLoader>);

        #[async_trait]
        impl RepoLoader for Forward {
            async fn load(&self, repo: &str, branch: &str) -> Result<Arc<RepoIndex>, LoadError> {
                self.0.load(repo, branch).await
            }
        }

        Arc::new(IndexCache::new(Box::new(Forward(loader))))
    }

    #[tokio::test]
    async fn test_second_call_returns_cached_index_without_reload() {
        let loader = Arc::new(CountingLoader::new());
        let cache = cache_with(loader.clone());

        let first = cache.get_or_create("octo/hello", "main").await.unwrap();
        let second = cache.get_or_create("octo/hello", "main").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_distinct_branches_load_separately() {
        let loader = Arc::new(CountingLoader::new());
        let cache = cache_with(loader.clone());

        cache.get_or_create("octo/hello", "main").await.unwrap();
        cache.get_or_create("octo/hello", "dev").await.unwrap();

        assert_eq!(loader.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_same_key_loads_exactly_once() {
        let loader = Arc::new(CountingLoader::with_delay(Duration::from_millis(50)));
        let cache = cache_with(loader.clone());

        let a = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_or_create("octo/hello", "main").await })
        };
        let b = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_or_create("octo/hello", "main").await })
        };

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_distinct_keys_run_in_parallel() {
        let loader = Arc::new(CountingLoader::with_delay(Duration::from_millis(100)));
        let cache = cache_with(loader.clone());

        let start = std::time::Instant::now();
        let a = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_or_create("octo/hello", "main").await })
        };
        let b = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_or_create("octo/world", "main").await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(loader.calls(), 2);
        // Two 100ms loads overlapping should finish well before 200ms.
        assert!(start.elapsed() < Duration::from_millis(190));
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let loader = Arc::new(CountingLoader::failing_first(1));
        let cache = cache_with(loader.clone());

        assert!(cache.get_or_create("octo/hello", "main").await.is_err());
        assert!(cache.get_or_create("octo/hello", "main").await.is_ok());
        assert_eq!(loader.calls(), 2);
    }
}
