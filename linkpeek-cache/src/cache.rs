//! In-memory TTL cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use linkpeek_core::constants::{DEFAULT_COMPACTION_INTERVAL, DEFAULT_PREVIEW_TTL};

/// Cache entry with an absolute deadline.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    /// `None` when `now + ttl` does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL used by [`TtlCache::set_default`], in seconds
    pub default_ttl_seconds: u64,
    /// How often expired entries are swept, in seconds (`None` disables it)
    pub compaction_interval_seconds: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: DEFAULT_PREVIEW_TTL.as_secs(),
            compaction_interval_seconds: Some(DEFAULT_COMPACTION_INTERVAL.as_secs()),
        }
    }
}

impl CacheConfig {
    /// The default TTL as a [`Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// The compaction interval, if compaction is enabled.
    pub fn compaction_interval(&self) -> Option<Duration> {
        self.compaction_interval_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// In-memory cache keyed by string.
///
/// Thread-safe. Entries expire lazily: an entry whose deadline has passed is
/// never returned, but stays in memory until it is overwritten or swept by
/// [`cleanup_expired`](Self::cleanup_expired). There is no size bound.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    config: CacheConfig,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Gets a live value by key.
    ///
    /// Returns None if the key was never set or its entry has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.value.clone())
    }

    /// Stores a value, replacing any previous entry, expiring after `ttl`.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = Instant::now().checked_add(ttl);
        self.entries
            .write()
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    /// Stores a value with the configured default TTL.
    pub fn set_default(&self, key: &str, value: V) {
        self.set(key, value, self.config.default_ttl());
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes all expired entries. Returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        before - entries.len()
    }

    /// Returns the number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len() - expired,
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Expired entries awaiting compaction
    pub expired_entries: usize,
    /// Live entries
    pub valid_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_set_get() {
        let cache = TtlCache::new();
        cache.set("url:a", 1u32, Duration::from_secs(60));
        assert_eq!(cache.get("url:a"), Some(1));
    }

    #[test]
    fn test_cache_miss() {
        let cache: TtlCache<u32> = TtlCache::new();
        assert!(cache.get("url:nope").is_none());
    }

    #[test]
    fn test_cache_keys_are_exact() {
        let cache = TtlCache::new();
        cache.set("url:A", 1u32, Duration::from_secs(60));
        assert!(cache.get("url:a").is_none());
    }

    #[test]
    fn test_cache_overwrite_resets_ttl() {
        let cache = TtlCache::new();
        cache.set("url:a", 1u32, Duration::from_millis(1));
        cache.set("url:a", 2u32, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get("url:a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let cache = TtlCache::new();
        cache.set("url:a", 1u32, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.get("url:a").is_none());
        // Expiry is lazy.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_zero_ttl_is_immediately_absent() {
        let cache = TtlCache::new();
        cache.set("url:a", 1u32, Duration::ZERO);
        assert!(cache.get("url:a").is_none());
    }

    #[test]
    fn test_cache_huge_ttl_never_expires() {
        let cache = TtlCache::new();
        cache.set("url:a", 1u32, Duration::MAX);
        assert_eq!(cache.get("url:a"), Some(1));
        assert_eq!(cache.stats().expired_entries, 0);
    }

    #[test]
    fn test_cache_set_default() {
        let cache = TtlCache::with_config(CacheConfig {
            default_ttl_seconds: 3600,
            compaction_interval_seconds: None,
        });
        cache.set_default("url:a", "x".to_string());
        assert_eq!(cache.get("url:a").as_deref(), Some("x"));
    }

    #[test]
    fn test_cache_clear() {
        let cache = TtlCache::new();
        cache.set("url:a", 1u32, Duration::from_secs(60));
        cache.set("url:b", 2u32, Duration::from_secs(60));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_stats() {
        let cache = TtlCache::new();
        cache.set("url:a", 1u32, Duration::from_secs(60));
        cache.set("url:b", 2u32, Duration::ZERO);
        assert_eq!(
            cache.stats(),
            CacheStats {
                total_entries: 2,
                expired_entries: 1,
                valid_entries: 1,
            }
        );
    }

    #[test]
    fn test_cache_cleanup_expired() {
        let cache = TtlCache::new();
        cache.set("url:a", 1u32, Duration::from_millis(1));
        cache.set("url:b", 2u32, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("url:b"), Some(2));
    }

    #[test]
    fn test_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.default_ttl(), DEFAULT_PREVIEW_TTL);
        assert_eq!(config.compaction_interval(), Some(DEFAULT_COMPACTION_INTERVAL));
    }

    #[test]
    fn test_config_compaction_interval() {
        let mut config = CacheConfig::default();
        assert_eq!(config.compaction_interval(), Some(Duration::from_secs(300)));
        config.compaction_interval_seconds = Some(0);
        assert_eq!(config.compaction_interval(), None);
        config.compaction_interval_seconds = None;
        assert_eq!(config.compaction_interval(), None);
    }
}
