//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion or last overwrite timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), always > created_at
    pub expires_at: u64,
    /// Number of successful reads since the last write
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now_ms`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now_ms` - Current time in Unix milliseconds
    /// * `ttl_ms` - Time to live in milliseconds, must be positive
    pub fn new(value: V, now_ms: u64, ttl_ms: u64) -> Self {
        debug_assert!(ttl_ms > 0, "ttl must be positive");
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms.max(1)),
            access_count: 0,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// The entry is still live at exactly `expires_at` and gone one
    /// millisecond later.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }

    /// Records a successful read.
    pub fn record_access(&mut self) {
        self.access_count += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value", 1_000, 500);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.created_at, 1_000);
        assert_eq!(entry.expires_at, 1_500);
        assert_eq!(entry.access_count, 0);
        assert!(entry.expires_at > entry.created_at);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", 1_000, 100);

        assert!(!entry.is_expired(1_000));
        assert!(!entry.is_expired(1_100), "live at exactly expires_at");
        assert!(entry.is_expired(1_101));
    }

    #[test]
    fn test_record_access() {
        let mut entry = CacheEntry::new(1u32, 0, 10);
        entry.record_access();
        entry.record_access();
        assert_eq!(entry.access_count, 2);
    }

    #[test]
    fn test_expires_at_saturates() {
        let entry = CacheEntry::new((), u64::MAX - 5, 100);
        assert_eq!(entry.expires_at, u64::MAX);
    }
}
