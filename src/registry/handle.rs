//! Borrowed view of a single tier.

use std::time::Duration;

use crate::cache::CacheStats;
use crate::registry::{CacheRegistry, CachedValue, Tier};

// == Tier Handle ==
/// A tier as seen through the registry.
///
/// Every call is forwarded to the registry, so the store itself is never
/// exposed to callers.
#[derive(Debug, Clone, Copy)]
pub struct TierHandle<'a> {
    registry: &'a CacheRegistry,
    tier: Tier,
}

impl<'a> TierHandle<'a> {
    pub(crate) fn new(registry: &'a CacheRegistry, tier: Tier) -> Self {
        Self { registry, tier }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn name(&self) -> &'static str {
        self.tier.as_str()
    }

    pub async fn get(&self, key: &str) -> Option<CachedValue> {
        self.registry.get(self.tier, key).await
    }

    pub async fn set(
        &self,
        key: impl Into<String>,
        value: CachedValue,
        ttl: Option<Duration>,
    ) -> Option<String> {
        self.registry.set(self.tier, key, value, ttl).await
    }

    pub async fn has(&self, key: &str) -> bool {
        self.registry.has(self.tier, key).await
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.registry.delete(self.tier, key).await
    }

    pub async fn clear(&self) {
        self.registry.clear(Some(self.tier)).await
    }

    pub async fn stats(&self) -> CacheStats {
        self.registry.tier_stats(self.tier).await
    }
}
