//! Cache Statistics Module
//!
//! Per-tier usage statistics and the running request counters behind them.

use serde::Serialize;

// == Cache Counters ==
/// Running request counters of one store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheCounters {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent or expired)
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries dropped because their TTL elapsed
    pub expirations: u64,
}

impl CacheCounters {
    // == Constructor ==
    /// Creates a new counter set with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Request Hit Ratio ==
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn request_hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}

// == Cache Stats ==
/// Point-in-time statistics of one tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Tier name
    pub name: String,
    /// Live entries after the cleanup sweep
    pub size: usize,
    /// Capacity of the tier
    pub max_size: usize,
    /// Fraction of live entries read at least once
    pub hit_rate: f64,
    /// Sum of access counts over live entries
    pub total_access: u64,
    /// Approximate bytes held by keys, values and entry overhead
    pub memory_estimate: usize,
    #[serde(flatten)]
    pub counters: CacheCounters,
}

impl CacheStats {
    /// Hit ratio over all requests served since the store was created.
    pub fn request_hit_ratio(&self) -> f64 {
        self.counters.request_hit_ratio()
    }
}
