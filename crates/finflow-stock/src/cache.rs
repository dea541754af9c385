//! Memo caches for tool results
//!
//! Each tool owns one fixed-capacity cache keyed by its call arguments. When
//! full, the least recently used entry is dropped. Entries never expire and
//! only successful results are stored.

use cached::{Cached, SizedCache};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Cache key for a tool call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Operation the result belongs to
    pub operation: String,
    /// Call arguments as a JSON string
    pub params: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(operation: impl Into<String>, params: impl Serialize) -> Self {
        Self {
            operation: operation.into(),
            params: serde_json::to_string(&params).unwrap_or_default(),
        }
    }
}

/// Thread-safe, fixed-capacity memo cache
pub struct MemoCache<V> {
    cache: RwLock<SizedCache<CacheKey, V>>,
}

impl<V: Clone> MemoCache<V> {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(SizedCache::with_size(capacity.max(1))),
        }
    }

    /// Get a value from the cache, marking it as recently used
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: V) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If the value exists in cache, it's returned immediately.
    /// Otherwise the fetcher runs and a successful result is cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(operation = %key.operation, "Cache hit");
            return Ok(value);
        }

        tracing::debug!(operation = %key.operation, "Cache miss");

        let value = fetcher().await?;
        let operation = key.operation.clone();
        self.insert(key, value.clone()).await;
        let entries = self.len().await;
        tracing::debug!(%operation, entries, "Cached result");

        Ok(value)
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_key_creation() {
        let key = CacheKey::new("stock_data.period", json!({ "ticker": "AAPL", "period": "1y" }));
        assert_eq!(key.operation, "stock_data.period");
        assert!(key.params.contains("AAPL"));
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = MemoCache::new(4);
        let key = CacheKey::new("news", "AAPL");

        cache.insert(key.clone(), "summary".to_string()).await;

        assert_eq!(cache.get(&key).await, Some("summary".to_string()));
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = MemoCache::new(4);
        let key = CacheKey::new("news", "AAPL");

        let mut call_count = 0;
        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>("fresh".to_string()) }
            })
            .await
            .unwrap();
        assert_eq!(result, "fresh");
        assert_eq!(call_count, 1);

        let result = cache
            .get_or_fetch(key, || {
                call_count += 1;
                async { Ok::<_, String>("stale".to_string()) }
            })
            .await
            .unwrap();
        assert_eq!(result, "fresh");
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache: MemoCache<String> = MemoCache::new(4);
        let key = CacheKey::new("news", "AAPL");

        let result = cache
            .get_or_fetch(key.clone(), || async { Err::<String, _>("boom") })
            .await;
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty().await);

        let result = cache
            .get_or_fetch(key, || async { Ok::<_, &str>("recovered".to_string()) })
            .await;
        assert_eq!(result, Ok("recovered".to_string()));
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let cache = MemoCache::new(2);
        let a = CacheKey::new("news", "A");
        let b = CacheKey::new("news", "B");
        let c = CacheKey::new("news", "C");

        cache.insert(a.clone(), 1).await;
        cache.insert(b.clone(), 2).await;
        // Touch A so B becomes the eviction candidate
        assert_eq!(cache.get(&a).await, Some(1));
        cache.insert(c.clone(), 3).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(&a).await, Some(1));
        assert_eq!(cache.get(&b).await, None);
        assert_eq!(cache.get(&c).await, Some(3));
    }
}
