//! LRU Tracker Module
//!
//! Keeps the last-access time of every key for least-recently-used eviction.

use std::collections::HashMap;

// == LRU Tracker ==
/// Tracks last access per key for LRU eviction.
///
/// Each key maps to `(timestamp_ms, sequence)`. Eviction selects the smallest
/// timestamp; the sequence counter only orders keys touched within the same
/// millisecond.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Last access stamp per key
    access_times: HashMap<String, (u64, u64)>,
    /// Monotonic touch counter
    sequence: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Records an access of `key` at `now_ms`, inserting it if new.
    pub fn touch(&mut self, key: &str, now_ms: u64) {
        self.sequence += 1;
        let stamp = (now_ms, self.sequence);
        match self.access_times.get_mut(key) {
            Some(existing) => *existing = stamp,
            None => {
                self.access_times.insert(key.to_string(), stamp);
            }
        }
    }

    // == Remove ==
    /// Removes a key from the tracker. Returns whether it was tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        self.access_times.remove(key).is_some()
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let oldest = self.peek_oldest()?.to_string();
        self.access_times.remove(&oldest);
        Some(oldest)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.access_times
            .iter()
            .min_by_key(|(_, stamp)| **stamp)
            .map(|(key, _)| key.as_str())
    }

    /// Last access timestamp of `key`, if tracked.
    pub fn last_access(&self, key: &str) -> Option<u64> {
        self.access_times.get(key).map(|(ts, _)| *ts)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.access_times.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.access_times.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.access_times.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let lru = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
    }

    #[test]
    fn test_lru_oldest_timestamp_wins() {
        let mut lru = LruTracker::new();

        lru.touch("key1", 30);
        lru.touch("key2", 10);
        lru.touch("key3", 20);

        assert_eq!(lru.peek_oldest(), Some("key2"));
    }

    #[test]
    fn test_lru_touch_existing_key() {
        let mut lru = LruTracker::new();

        lru.touch("key1", 1);
        lru.touch("key2", 2);
        lru.touch("key3", 3);

        // Touch key1 again - it becomes the newest
        lru.touch("key1", 4);

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some("key2"));
        assert_eq!(lru.last_access("key1"), Some(4));
    }

    #[test]
    fn test_lru_same_millisecond_keeps_touch_order() {
        let mut lru = LruTracker::new();

        lru.touch("a", 5);
        lru.touch("b", 5);
        lru.touch("c", 5);
        lru.touch("a", 5);

        assert_eq!(lru.evict_oldest(), Some("b".to_string()));
        assert_eq!(lru.evict_oldest(), Some("c".to_string()));
        assert_eq!(lru.evict_oldest(), Some("a".to_string()));
    }

    #[test]
    fn test_lru_evict_empty() {
        let mut lru = LruTracker::new();
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = LruTracker::new();

        lru.touch("key1", 1);
        lru.touch("key2", 2);
        lru.touch("key3", 3);

        assert!(lru.remove("key2"));
        assert!(!lru.remove("nonexistent"));

        assert_eq!(lru.len(), 2);
        assert_eq!(lru.last_access("key2"), None);
        assert_eq!(lru.last_access("key1"), Some(1));
        assert_eq!(lru.last_access("key3"), Some(3));
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = LruTracker::new();
        lru.touch("a", 1);
        lru.touch("b", 2);
        lru.clear();
        assert!(lru.is_empty());
        assert_eq!(lru.peek_oldest(), None);
    }
}
