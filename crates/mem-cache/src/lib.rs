use appmeta_package::CacheEntry;
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Value of the cache.
#[derive(Debug, Clone)]
struct CachedValue {
    entry: CacheEntry,
    expires_at: Option<Instant>,
}

impl CachedValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Shared in-memory cache of catalog metadata.
///
/// The key of this hashmap is the id of each package. It is safe to share between tasks:
/// every operation is atomic per key.
#[derive(Debug, Default)]
pub struct MemCache {
    entries: DashMap<String, CachedValue>,
    expiration: Option<Duration>,
}

impl MemCache {
    /// Create a cache whose entries never expire.
    pub fn new() -> Self {
        MemCache::default()
    }

    /// Create a cache whose entries expire `expiration` after they were added.
    pub fn with_expiration(expiration: Duration) -> Self {
        MemCache { entries: DashMap::new(), expiration: Some(expiration) }
    }

    /// Insert or replace the entry of `key`.
    ///
    /// An expiration too far in the future to be represented means the entry never expires.
    pub fn add(&self, key: impl Into<String>, entry: CacheEntry) {
        let expires_at =
            self.expiration.and_then(|expiration| Instant::now().checked_add(expiration));
        let key = key.into();
        tracing::trace!(target: "appmeta::cache", ?key, "Add entry");
        self.entries.insert(key, CachedValue { entry, expires_at });
    }

    /// Get a copy of the entry of `key`. An expired entry is evicted and reported as absent.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.remove_if(key, |_, value| value.is_expired(Instant::now()));
        self.entries.get(key).map(|value| value.entry.clone())
    }

    /// Remove the entry of `key`, returning it if it existed.
    pub fn delete(&self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key).map(|(_, value)| value.entry)
    }

    /// Evict every expired entry and return how many were evicted.
    pub fn clean_expired(&self) -> usize {
        let now = Instant::now();
        let mut evicted = 0;
        self.entries.retain(|_, value| {
            let expired = value.is_expired(now);
            evicted += usize::from(expired);
            !expired
        });
        evicted
    }

    /// Number of stored entries, expired ones included until they are evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
