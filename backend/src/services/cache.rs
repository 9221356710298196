//! Time-bounded memoization of query results.
//!
//! Each query function owns one [`QueryCache`], named after the function, so
//! entries are keyed by `(function, parameters)`. Entries expire after a
//! fixed time-to-live. Concurrent callers asking for the same key while a
//! fetch is in flight wait for that fetch instead of starting their own.
//! Failed fetches are not cached.

use log::debug;
use moka::future::Cache;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::db::config::CacheConfig;
use crate::db::repository::{RepositoryError, RepositoryResult};

pub struct QueryCache<K, V> {
    name: &'static str,
    inner: Cache<K, V>,
}

impl<K, V> QueryCache<K, V>
where
    K: Hash + Eq + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .name(name)
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_seconds))
            .build();
        Self { name, inner }
    }

    /// Cache with an explicit time-to-live, mostly for tests.
    pub fn with_ttl(name: &'static str, ttl: Duration, max_entries: u64) -> Self {
        let inner = Cache::builder()
            .name(name)
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { name, inner }
    }

    /// Return the cached value for `key`, or run `fetch` and cache its success.
    pub async fn get_or_fetch<F>(&self, key: K, fetch: F) -> RepositoryResult<V>
    where
        F: Future<Output = RepositoryResult<V>>,
    {
        if self.inner.contains_key(&key) {
            debug!("{}: cache hit for {:?}", self.name, key);
        }
        self.inner
            .try_get_with(key, fetch)
            .await
            .map_err(|e: Arc<RepositoryError>| RepositoryError::clone(&e))
    }

    /// Cached value for `key`, if present and not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StoreKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let cache: QueryCache<usize, Vec<u32>> =
            QueryCache::with_ttl("get_longest_routes", Duration::from_secs(60), 100);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(10, async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(value, vec![1, 2, 3]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_parameters_are_distinct_entries() {
        let cache: QueryCache<usize, usize> =
            QueryCache::with_ttl("get_top_profitable_routes", Duration::from_secs(60), 100);
        let a = cache.get_or_fetch(5, async { Ok(5) }).await.unwrap();
        let b = cache.get_or_fetch(10, async { Ok(10) }).await.unwrap();
        assert_eq!((a, b), (5, 10));
        assert_eq!(cache.get(&5).await, Some(5));
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache: QueryCache<&'static str, u32> =
            QueryCache::with_ttl("list_airports", Duration::from_millis(100), 100);
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, RepositoryError>(7)
        };

        cache.get_or_fetch("all", fetch()).await.unwrap();
        cache.get_or_fetch("all", fetch()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(250)).await;
        cache.get_or_fetch("all", fetch()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache: QueryCache<usize, u32> =
            QueryCache::with_ttl("get_airport_connections", Duration::from_secs(60), 100);

        let err = cache
            .get_or_fetch(1, async { Err(RepositoryError::query(StoreKind::Graph, "boom")) })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "boom");
        assert_eq!(cache.get(&1).await, None);

        let value = cache.get_or_fetch(1, async { Ok(3) }).await.unwrap();
        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn test_invalidate_all_forces_refetch() {
        let cache: QueryCache<usize, u32> =
            QueryCache::with_ttl("get_longest_routes", Duration::from_secs(60), 100);
        cache.get_or_fetch(1, async { Ok(1) }).await.unwrap();
        cache.invalidate_all();
        let value = cache.get_or_fetch(1, async { Ok(2) }).await.unwrap();
        assert_eq!(value, 2);
    }
}
