//! Cache Store Module
//!
//! HashMap storage with policy-driven eviction and lazy TTL expiration.
//!
//! `CacheStore` itself is not synchronized; every method takes `&self` or
//! `&mut self` and `CacheEngine` holds it behind a single mutex, so one
//! method call is one indivisible operation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, EvictionPolicy};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Main cache storage with eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// How to pick a victim when full
    policy: EvictionPolicy,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Running counters, occupancy filled in on snapshot
    stats: CacheStats,
    /// Last timestamp handed out by `tick`
    last_tick: Option<Instant>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// A `max_size` of zero is accepted but every insert of a new key will
    /// fail with `CacheError::CacheFull`.
    pub fn new(max_size: usize, policy: EvictionPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
            max_size,
            stats: CacheStats::new(max_size, policy),
            last_tick: None,
        }
    }

    // == Clock ==
    /// Returns a timestamp strictly later than any previously returned one.
    ///
    /// Two operations in the same clock quantum still get distinct
    /// `accessed_at`/`created_at` values, so recency order always matches
    /// call order.
    fn tick(&mut self) -> Instant {
        let now = Instant::now();
        let now = match self.last_tick {
            Some(last) if now <= last => last + Duration::from_nanos(1),
            _ => now,
        };
        self.last_tick = Some(now);
        now
    }

    /// Current time for read-only checks; never behind the last tick.
    fn now(&self) -> Instant {
        let now = Instant::now();
        self.last_tick.map_or(now, |last| now.max(last))
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired, touching the entry.
    /// Expired entries are removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.tick();

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.entries.remove(key);
            self.stats.record_miss();
            debug!("Key {} expired and removed", key);
            return None;
        }

        entry.touch(now);
        self.stats.record_hit();
        Some(entry.value.clone())
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// A live existing key is overwritten in place and never triggers
    /// eviction. A new key at capacity evicts exactly one entry first.
    /// An existing key that has already expired is replaced by a fresh entry.
    ///
    /// # Errors
    /// `CacheError::CacheFull` if the store is at capacity and holds nothing
    /// to evict; the store is left unchanged.
    pub fn set(&mut self, key: String, value: V, ttl: Option<Duration>) -> Result<()> {
        let now = self.tick();

        if let Some(entry) = self.entries.get_mut(&key) {
            if !entry.is_expired(now) {
                entry.overwrite(value, ttl, now);
                debug!("Updated key: {}", key);
                return Ok(());
            }
            self.entries.remove(&key);
            debug!("Key {} expired, replacing with fresh entry", key);
        }

        if self.entries.len() >= self.max_size {
            self.evict_one()?;
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, ttl, now));
        debug!("Set key: {}", key);
        Ok(())
    }

    // == Evict ==
    /// Removes one entry chosen by the configured policy.
    fn evict_one(&mut self) -> Result<String> {
        match self.policy.select_victim(&self.entries) {
            Some(victim) => {
                self.entries.remove(&victim);
                self.stats.record_eviction();
                info!("Evicted {} ({})", victim, self.policy);
                Ok(victim)
            }
            None => {
                warn!(
                    "Failed to evict an entry, cache is full (max_size={})",
                    self.max_size
                );
                Err(CacheError::CacheFull(format!(
                    "no entry to evict with max_size={}",
                    self.max_size
                )))
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!("Deleted key: {}", key);
        }
        removed
    }

    // == Keys ==
    /// Returns all non-expired keys in ascending order.
    pub fn keys(&self) -> Vec<String> {
        let now = self.now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_unstable();
        keys
    }

    // == Stats ==
    /// Returns a snapshot of occupancy and counters.
    pub fn stats(&self) -> CacheStats {
        let now = self.now();
        let expired = self
            .entries
            .values()
            .filter(|entry| entry.is_expired(now))
            .count();

        let mut stats = self.stats.clone();
        stats.set_occupancy(self.entries.len(), expired);
        stats
    }

    // == Purge Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.now();
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            let expired = entry.is_expired(now);
            if expired {
                debug!("Sweep removed expired key {}", key);
            }
            !expired
        });
        before - self.entries.len()
    }

    // == Peek ==
    /// Returns the raw entry without touching it or checking expiry.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Accessors ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn store(max_size: usize, policy: EvictionPolicy) -> CacheStore<String> {
        CacheStore::new(max_size, policy)
    }

    fn set(store: &mut CacheStore<String>, key: &str, value: &str) {
        store.set(key.to_string(), value.to_string(), None).unwrap();
    }

    #[test]
    fn test_store_new() {
        let store = store(100, EvictionPolicy::Lru);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_size(), 100);
        assert_eq!(store.policy(), EvictionPolicy::Lru);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store(100, EvictionPolicy::Lru);

        set(&mut store, "key1", "value1");

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100, EvictionPolicy::Lru);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_get_touches_entry() {
        let mut store = store(100, EvictionPolicy::Lru);
        set(&mut store, "key1", "value1");
        let created = store.peek("key1").unwrap().accessed_at;

        store.get("key1");
        store.get("key1");

        let entry = store.peek("key1").unwrap();
        assert_eq!(entry.access_count, 2);
        assert!(entry.accessed_at > created);
    }

    #[test]
    fn test_store_delete_twice() {
        let mut store = store(100, EvictionPolicy::Lru);

        set(&mut store, "key1", "value1");

        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));
        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_overwrite_preserves_bookkeeping() {
        let mut store = store(100, EvictionPolicy::Lru);

        set(&mut store, "key1", "value1");
        store.get("key1");
        let before = store.peek("key1").unwrap().clone();

        store
            .set("key1".to_string(), "value2".to_string(), Some(Duration::from_secs(30)))
            .unwrap();

        let after = store.peek("key1").unwrap();
        assert_eq!(after.value, "value2");
        assert_eq!(after.ttl, Some(Duration::from_secs(30)));
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.access_count, before.access_count);
        assert!(after.accessed_at > before.accessed_at);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let mut store = store(2, EvictionPolicy::Lru);

        set(&mut store, "a", "1");
        set(&mut store, "b", "2");
        set(&mut store, "a", "3");

        assert_eq!(store.keys(), vec!["a", "b"]);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = store(100, EvictionPolicy::Lru);

        store
            .set("x".to_string(), "v".to_string(), Some(Duration::from_millis(100)))
            .unwrap();
        assert_eq!(store.get("x"), Some("v".to_string()));

        sleep(Duration::from_millis(200));

        assert_eq!(store.get("x"), None);
        // Lazy expiry removed it outright
        assert!(store.peek("x").is_none());
        assert!(store.keys().is_empty());

        // A fresh set right after works
        store
            .set("x".to_string(), "v".to_string(), Some(Duration::from_millis(100)))
            .unwrap();
        assert_eq!(store.get("x"), Some("v".to_string()));
    }

    #[test]
    fn test_set_over_expired_entry_starts_fresh() {
        let mut store = store(100, EvictionPolicy::Lru);

        store
            .set("x".to_string(), "old".to_string(), Some(Duration::from_millis(50)))
            .unwrap();
        let first_created = store.peek("x").unwrap().created_at;
        sleep(Duration::from_millis(100));

        // Not read in between, so the expired entry is still stored
        assert_eq!(store.len(), 1);
        store
            .set("x".to_string(), "new".to_string(), Some(Duration::from_secs(10)))
            .unwrap();

        let entry = store.peek("x").unwrap();
        assert!(entry.created_at > first_created);
        assert_eq!(entry.access_count, 0);
        assert_eq!(store.get("x"), Some("new".to_string()));
    }

    #[test]
    fn test_lru_scenario() {
        let mut store = store(2, EvictionPolicy::Lru);

        set(&mut store, "a", "1");
        set(&mut store, "b", "2");
        store.get("a");
        set(&mut store, "c", "3");

        assert_eq!(store.keys(), vec!["a", "c"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_lru_overwrite_counts_as_access() {
        let mut store = store(2, EvictionPolicy::Lru);

        set(&mut store, "a", "1");
        set(&mut store, "b", "2");
        set(&mut store, "a", "1b");
        set(&mut store, "c", "3");

        assert_eq!(store.keys(), vec!["a", "c"]);
    }

    #[test]
    fn test_lfu_eviction() {
        let mut store = store(3, EvictionPolicy::Lfu);

        set(&mut store, "a", "1");
        set(&mut store, "b", "2");
        set(&mut store, "c", "3");
        store.get("a");
        store.get("a");
        store.get("c");

        set(&mut store, "d", "4");

        assert_eq!(store.keys(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_ttl_policy_evicts_oldest_created() {
        let mut store = store(2, EvictionPolicy::Ttl);

        set(&mut store, "a", "1");
        set(&mut store, "b", "2");
        // Access pattern is irrelevant for this policy
        store.get("a");
        store.get("a");
        set(&mut store, "c", "3");

        assert_eq!(store.keys(), vec!["b", "c"]);
    }

    #[test]
    fn test_ttl_policy_scenario() {
        let mut store = store(2, EvictionPolicy::Ttl);

        set(&mut store, "a", "1");
        set(&mut store, "b", "2");
        set(&mut store, "c", "3");

        assert_eq!(store.keys(), vec!["b", "c"]);
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_zero_capacity_reports_cache_full() {
        let mut store = store(0, EvictionPolicy::Lru);

        let result = store.set("a".to_string(), "1".to_string(), None);

        assert!(matches!(result, Err(CacheError::CacheFull(_))));
        assert!(store.is_empty());
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(4, EvictionPolicy::Lfu);

        set(&mut store, "key1", "value1");
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.max_size, 4);
        assert_eq!(stats.expired_count, 0);
        assert_eq!(stats.eviction_policy, EvictionPolicy::Lfu);
        assert!((stats.memory_usage_percentage - 25.0).abs() < 1e-9);
        assert_eq!(stats.total_entries, store.keys().len());
    }

    #[test]
    fn test_stats_counts_unswept_expired() {
        let mut store = store(10, EvictionPolicy::Lru);

        store
            .set("short".to_string(), "v".to_string(), Some(Duration::from_millis(20)))
            .unwrap();
        set(&mut store, "long", "v");
        sleep(Duration::from_millis(60));

        let stats = store.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_count, 1);
        assert_eq!(store.keys(), vec!["long"]);
    }

    #[test]
    fn test_keys_does_not_touch() {
        let mut store = store(10, EvictionPolicy::Lru);
        set(&mut store, "a", "1");

        store.keys();
        store.stats();

        assert_eq!(store.peek("a").unwrap().access_count, 0);
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = store(100, EvictionPolicy::Lru);

        store
            .set("key1".to_string(), "value1".to_string(), Some(Duration::from_millis(50)))
            .unwrap();
        store
            .set("key2".to_string(), "value2".to_string(), Some(Duration::from_secs(10)))
            .unwrap();

        sleep(Duration::from_millis(100));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key2"), Some("value2".to_string()));
        assert_eq!(store.purge_expired(), 0);
    }
}
