//! Cache Store Module
//!
//! A single named tier: HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{
    CacheCounters, CacheEntry, CacheStats, LruTracker, SharedClock, ENTRY_OVERHEAD_BYTES,
};

// == Cache Store ==
/// Bounded cache tier with per-entry TTL and LRU eviction.
///
/// `entries` and the LRU tracker always hold exactly the same key set, and
/// `len() <= max_size()` after every public call.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Tier name
    name: String,
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Last-access tracker
    lru: LruTracker,
    /// Request counters
    counters: CacheCounters,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL used when callers omit one or pass zero
    default_ttl_ms: u64,
    /// Time source
    clock: SharedClock,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `name` - Tier name, fixed for the life of the store
    /// * `max_size` - Capacity; 0 is raised to 1
    /// * `default_ttl` - TTL for entries stored without one; zero is raised to 1 ms
    /// * `clock` - Time source
    pub fn new(
        name: impl Into<String>,
        max_size: usize,
        default_ttl: Duration,
        clock: SharedClock,
    ) -> Self {
        let name = name.into();
        if max_size == 0 {
            warn!(tier = %name, "max_size of 0 is not allowed, using 1");
        }
        Self {
            name,
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: CacheCounters::new(),
            max_size: max_size.max(1),
            default_ttl_ms: (default_ttl.as_millis() as u64).max(1),
            clock,
        }
    }

    // == Set ==
    /// Stores a value, sweeping expired entries first and evicting the least
    /// recently used entry if the tier is full and `key` is new.
    ///
    /// Overwriting resets `created_at`, `expires_at` and the access count. A
    /// `ttl` of zero is treated as absent and replaced by the tier default.
    ///
    /// Returns the key evicted to make room, if any.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: V,
        ttl: Option<Duration>,
    ) -> Option<String> {
        let key = key.into();
        let now = self.clock.now_ms();

        self.sweep_expired(now);

        let ttl_ms = match ttl {
            Some(ttl) if ttl.is_zero() => {
                warn!(tier = %self.name, key = %key, "non-positive ttl, using tier default");
                self.default_ttl_ms
            }
            Some(ttl) => (ttl.as_millis() as u64).max(1),
            None => self.default_ttl_ms,
        };

        let mut evicted = None;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
                self.counters.record_eviction();
                debug!(tier = %self.name, key = %oldest, "evicted least recently used entry");
                evicted = Some(oldest);
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, now, ttl_ms));
        self.lru.touch(&key, now);
        self.debug_check_invariants();

        evicted
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// `None` means a miss: the key is absent or its entry expired, in which
    /// case the entry is removed on the spot.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_with(key, |value| Some(value.clone()))
    }

    /// Reads `key` through `accept`. The read counts as a hit, and touches
    /// the entry, only when `accept` returns `Some`; otherwise it is a miss
    /// and the entry is left as it was.
    pub fn get_with<T, F>(&mut self, key: &str, accept: F) -> Option<T>
    where
        F: FnOnce(&V) -> Option<T>,
    {
        let now = self.clock.now_ms();

        if self.expire_if_stale(key, now) {
            self.counters.record_miss();
            return None;
        }

        let accepted = self
            .entries
            .get_mut(key)
            .and_then(|entry| accept(&entry.value).map(|out| (entry, out)));

        match accepted {
            Some((entry, out)) => {
                entry.record_access();
                self.lru.touch(key, now);
                self.counters.record_hit();
                Some(out)
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Returns whether `key` holds a live entry, without touching access
    /// metadata. An expired entry is removed.
    pub fn has(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        if self.expire_if_stale(key, now) {
            return false;
        }
        self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether the key existed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.lru.remove(key);
        removed
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.sweep_expired(now)
    }

    // == Remove Matching ==
    /// Deletes every key for which `predicate` holds. Returns the count.
    pub fn remove_matching<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        self.remove_where(|key, _| predicate(key))
    }

    /// Read-only view of an entry, expired or not.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Timestamp of the last `get` or `set` of `key`.
    pub fn last_access(&self, key: &str) -> Option<u64> {
        self.lru.last_access(key)
    }

    /// Snapshot of the stored keys, expired or not.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn counters(&self) -> CacheCounters {
        self.counters
    }

    // == Length ==
    /// Returns the number of stored entries, including not-yet-swept ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn expire_if_stale(&mut self, key: &str, now: u64) -> bool {
        let stale = self
            .entries
            .get(key)
            .map(|entry| entry.is_expired(now))
            .unwrap_or(false);

        if stale {
            self.entries.remove(key);
            self.lru.remove(key);
            self.counters.record_expirations(1);
            debug!(tier = %self.name, key = %key, "dropped expired entry on access");
        }
        stale
    }

    fn sweep_expired(&mut self, now: u64) -> usize {
        let removed = self.remove_where(|_, entry| entry.is_expired(now));
        self.counters.record_expirations(removed);
        removed
    }

    fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&str, &CacheEntry<V>) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| predicate(key, entry))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.lru.remove(key);
        }
        doomed.len()
    }

    fn debug_check_invariants(&self) {
        debug_assert!(self.entries.len() <= self.max_size);
        debug_assert_eq!(self.entries.len(), self.lru.len());
    }
}

impl<V: Clone + Serialize> CacheStore<V> {
    // == Stats ==
    /// Sweeps expired entries, then reports statistics over the survivors.
    pub fn stats(&mut self) -> CacheStats {
        self.cleanup_expired();

        let size = self.entries.len();
        let total_access = self.entries.values().map(|e| e.access_count).sum();
        let accessed = self.entries.values().filter(|e| e.access_count > 0).count();
        let hit_rate = if size == 0 {
            0.0
        } else {
            accessed as f64 / size as f64
        };
        let memory_estimate = self
            .entries
            .iter()
            .map(|(key, entry)| {
                let value_len = serde_json::to_vec(&entry.value)
                    .map(|bytes| bytes.len())
                    .unwrap_or(0);
                key.len() + value_len + ENTRY_OVERHEAD_BYTES
            })
            .sum();

        CacheStats {
            name: self.name.clone(),
            size,
            max_size: self.max_size,
            hit_rate,
            total_access,
            memory_estimate,
            counters: self.counters,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Clock, ManualClock};
    use std::sync::Arc;

    fn store_with_clock(max_size: usize) -> (CacheStore<String>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let store = CacheStore::new(
            "test",
            max_size,
            Duration::from_secs(300),
            Arc::new(clock.clone()),
        );
        (store, clock)
    }

    fn tick(clock: &ManualClock) {
        clock.advance(Duration::from_millis(1));
    }

    #[test]
    fn test_store_new() {
        let (store, _) = store_with_clock(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.name(), "test");
        assert_eq!(store.max_size(), 100);
        assert_eq!(store.default_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_store_zero_capacity_is_clamped() {
        let (store, _) = store_with_clock(0);
        assert_eq!(store.max_size(), 1);
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock(100);

        store.set("key1", "value1".to_string(), None);

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock(100);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_cached_empty_value_is_a_hit() {
        let clock = ManualClock::new(0);
        let mut store: CacheStore<Option<String>> =
            CacheStore::new("nullable", 10, Duration::from_secs(1), Arc::new(clock));

        store.set("nothing", None, None);

        assert_eq!(store.get("nothing"), Some(None));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_store_rejected_read_is_a_miss() {
        let (mut store, _clock) = store_with_clock(10);
        store.set("page", "not a number".to_string(), None);

        let parsed: Option<u32> = store.get_with("page", |v| v.parse().ok());

        assert_eq!(parsed, None);
        assert_eq!(store.counters().hits, 0);
        assert_eq!(store.counters().misses, 1);
        assert_eq!(store.entry("page").unwrap().access_count, 0);
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = store_with_clock(100);

        store.set("key1", "value1".to_string(), None);
        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_overwrite_resets_metadata() {
        let (mut store, clock) = store_with_clock(100);

        store.set("key1", "value1".to_string(), None);
        store.get("key1");
        tick(&clock);
        store.set("key1", "value2".to_string(), Some(Duration::from_millis(500)));

        let entry = store.entry("key1").unwrap();
        assert_eq!(entry.value, "value2");
        assert_eq!(entry.access_count, 0);
        assert_eq!(entry.created_at, clock.now_ms());
        assert_eq!(entry.expires_at, clock.now_ms() + 500);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with_clock(100);

        store.set("key1", "value1".to_string(), Some(Duration::from_millis(100)));
        assert!(store.get("key1").is_some());

        clock.advance(Duration::from_millis(150));

        assert_eq!(store.get("key1"), None);
        assert!(!store.has("key1"));
        assert!(store.is_empty(), "expired entry is removed lazily");
    }

    #[test]
    fn test_store_zero_ttl_uses_default() {
        let (mut store, clock) = store_with_clock(100);

        store.set("key1", "value1".to_string(), Some(Duration::ZERO));

        let entry = store.entry("key1").unwrap();
        assert_eq!(entry.expires_at - entry.created_at, 300_000);
        clock.advance(Duration::from_secs(10));
        assert!(store.has("key1"));
    }

    #[test]
    fn test_store_has_does_not_touch_access() {
        let (mut store, clock) = store_with_clock(2);

        store.set("a", "1".to_string(), None);
        tick(&clock);
        store.set("b", "2".to_string(), None);
        tick(&clock);

        assert!(store.has("a"));
        assert_eq!(store.entry("a").unwrap().access_count, 0);

        store.set("c", "3".to_string(), None);
        assert!(!store.has("a"), "has() must not refresh recency");
    }

    #[test]
    fn test_store_lru_eviction() {
        let (mut store, clock) = store_with_clock(2);

        store.set("A", "a".to_string(), None);
        tick(&clock);
        store.set("B", "b".to_string(), None);
        tick(&clock);
        store.get("B");
        tick(&clock);

        let evicted = store.set("C", "c".to_string(), None);

        assert_eq!(evicted.as_deref(), Some("A"));
        assert_eq!(store.len(), 2);
        assert!(store.has("B"));
        assert!(store.has("C"));
        assert!(!store.has("A"));
        assert_eq!(store.counters().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let (mut store, clock) = store_with_clock(3);

        for key in ["key1", "key2", "key3"] {
            store.set(key, key.to_uppercase(), None);
            tick(&clock);
        }

        store.get("key1");
        tick(&clock);

        store.set("key4", "KEY4".to_string(), None);

        assert!(store.get("key1").is_some());
        assert_eq!(store.get("key2"), None);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let (mut store, clock) = store_with_clock(2);

        store.set("a", "1".to_string(), None);
        tick(&clock);
        store.set("b", "2".to_string(), None);
        tick(&clock);

        assert_eq!(store.set("a", "3".to_string(), None), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_sweep_frees_room_before_eviction() {
        let (mut store, clock) = store_with_clock(2);

        store.set("short", "1".to_string(), Some(Duration::from_millis(10)));
        store.set("long", "2".to_string(), None);
        clock.advance(Duration::from_millis(20));

        let evicted = store.set("new", "3".to_string(), None);

        assert_eq!(evicted, None);
        assert!(store.has("long"));
        assert!(store.has("new"));
        assert_eq!(store.counters().expirations, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = store_with_clock(100);

        store.set("key1", "value1".to_string(), Some(Duration::from_secs(1)));
        store.set("key2", "value2".to_string(), Some(Duration::from_secs(10)));

        clock.advance(Duration::from_millis(1100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());
    }

    #[test]
    fn test_store_clear_twice() {
        let (mut store, _) = store_with_clock(10);
        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);

        store.clear();
        assert_eq!(store.len(), 0);
        store.clear();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_remove_matching() {
        let (mut store, _) = store_with_clock(10);
        store.set("user_42_profile", "p".to_string(), None);
        store.set("user_42_orders", "o".to_string(), None);
        store.set("user_7_profile", "p".to_string(), None);

        assert_eq!(store.remove_matching(|k| k.contains("user_42")), 2);
        assert_eq!(store.keys(), vec!["user_7_profile".to_string()]);
    }

    #[test]
    fn test_store_stats_after_expiry() {
        let (mut store, clock) = store_with_clock(100);

        store.set("a", "1".to_string(), Some(Duration::from_millis(100)));
        store.set("b", "2".to_string(), Some(Duration::from_millis(100)));
        store.set("c", "3".to_string(), Some(Duration::from_secs(60)));

        store.get("c");
        store.get("c");
        store.get("c");
        clock.advance(Duration::from_millis(150));
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), None);

        let stats = store.stats();
        assert_eq!(stats.name, "test");
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_size, 100);
        assert_eq!(stats.total_access, 3);
        assert_eq!(stats.hit_rate, 1.0);
        assert_eq!(stats.counters.hits, 3);
        assert_eq!(stats.counters.misses, 2);
        assert_eq!(stats.counters.expirations, 2);
        assert_eq!(stats.memory_estimate, "c".len() + "\"3\"".len() + ENTRY_OVERHEAD_BYTES);
    }

    #[test]
    fn test_store_stats_hit_rate_fraction() {
        let (mut store, _) = store_with_clock(10);
        store.set("read", "1".to_string(), None);
        store.set("unread", "2".to_string(), None);
        store.get("read");

        let stats = store.stats();
        assert_eq!(stats.hit_rate, 0.5);
        assert_eq!(stats.total_access, 1);
    }

    #[test]
    fn test_store_stats_empty() {
        let (mut store, _) = store_with_clock(10);
        let stats = store.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hit_rate, 0.0);
        assert_eq!(stats.memory_estimate, 0);
    }
}
