//! In-memory caching for validated API responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct CacheInner {
    map: HashMap<String, CacheEntry>,
}

impl CacheInner {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.body.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, key: String, body: String, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.map.insert(key, CacheEntry { body, expires_at });
    }

    fn clear_expired(&mut self) {
        let now = Instant::now();
        self.map.retain(|_, entry| entry.expires_at > now);
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Thread-safe TTL cache keyed by normalized request identity.
///
/// Expiry is lazy: an entry past its TTL is treated identically to a miss at
/// read time. Nothing is ever returned stale.
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached body for the given key if present and not expired.
    pub async fn get(&self, key: &str) -> Option<String> {
        let store = self.inner.read().await;
        store.get(key)
    }

    /// Store a body under the given key for `ttl`.
    pub async fn put(&self, key: String, body: String, ttl: Duration) {
        if ttl == Duration::ZERO {
            return;
        }
        let mut store = self.inner.write().await;
        store.put(key, body, ttl);
    }

    /// Remove entries whose TTL has already elapsed.
    pub async fn clear_expired(&self) {
        let mut store = self.inner.write().await;
        store.clear_expired();
    }

    /// Drop every entry immediately. Limiter state is untouched; the two
    /// resources are independent.
    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.clear();
    }

    /// Number of entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_miss_put_get_overwrite() {
        let cache = CacheStore::new();
        let ttl = Duration::from_secs(1);

        assert!(cache.get("k").await.is_none());

        cache.put("k".to_string(), "v1".to_string(), ttl).await;
        assert_eq!(cache.get("k").await, Some("v1".to_string()));

        cache.put("k".to_string(), "v2".to_string(), ttl).await;
        assert_eq!(cache.get("k").await, Some("v2".to_string()));
    }

    #[tokio::test]
    async fn expired_entry_reads_as_miss() {
        let cache = CacheStore::new();

        cache
            .put("k".to_string(), "v".to_string(), Duration::from_millis(80))
            .await;
        assert!(cache.get("k").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn clear_expired_sweeps_only_stale_entries() {
        let cache = CacheStore::new();

        cache
            .put("old".to_string(), "v".to_string(), Duration::from_millis(50))
            .await;
        cache
            .put("new".to_string(), "v".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.len().await, 2);

        tokio::time::sleep(Duration::from_millis(80)).await;
        cache.clear_expired().await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.get("new").await.is_some());
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let cache = CacheStore::new();

        cache
            .put("a".to_string(), "1".to_string(), Duration::from_secs(60))
            .await;
        cache
            .put("b".to_string(), "2".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.len().await, 2);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn zero_ttl_put_is_a_no_op() {
        let cache = CacheStore::new();
        cache
            .put("k".to_string(), "v".to_string(), Duration::ZERO)
            .await;
        assert!(cache.get("k").await.is_none());
        assert_eq!(cache.len().await, 0);
    }
}
