//! Aggregate statistics across all tiers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;

// == Stats Snapshot ==
/// Registry-wide statistics as of `refreshed_at`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSnapshot {
    /// When the snapshot was computed; `None` before the first refresh
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Per-tier statistics in registry order
    pub tiers: Vec<CacheStats>,
    /// Live entries across all tiers
    pub total_entries: usize,
    /// Sum of the per-tier memory estimates
    pub total_memory_estimate: usize,
}

impl StatsSnapshot {
    pub fn from_tiers(tiers: Vec<CacheStats>) -> Self {
        Self {
            refreshed_at: Some(Utc::now()),
            total_entries: tiers.iter().map(|t| t.size).sum(),
            total_memory_estimate: tiers.iter().map(|t| t.memory_estimate).sum(),
            tiers,
        }
    }

    /// Statistics of the tier named `name`, if present.
    pub fn tier(&self, name: &str) -> Option<&CacheStats> {
        self.tiers.iter().find(|t| t.name == name)
    }
}
