//! Cache Registry Module
//!
//! Owns the fixed set of named tiers and the periodically refreshed
//! statistics snapshot. Every read and write of a tier goes through here.

mod handle;
mod invalidation;
mod snapshot;
mod tier;

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore, SharedClock, SystemClock};
use crate::config::Config;
use crate::error::Result;

pub use handle::TierHandle;
pub use snapshot::StatsSnapshot;
pub use tier::Tier;

/// Payload type stored in every registry tier.
pub type CachedValue = Value;

// == Registry State ==
#[derive(Debug)]
struct RegistryState {
    /// One store per tier, indexed by `Tier::index`
    tiers: [CacheStore<CachedValue>; 4],
    /// Last computed statistics
    snapshot: StatsSnapshot,
}

impl RegistryState {
    fn store(&mut self, tier: Tier) -> &mut CacheStore<CachedValue> {
        &mut self.tiers[tier.index()]
    }
}

// == Cache Registry ==
/// Process-wide owner of all cache tiers.
///
/// Construct once at startup, share as `Arc<CacheRegistry>`, and call
/// [`CacheRegistry::shutdown`] on teardown. Operations never hold the lock
/// across an await other than the lock acquisition itself.
#[derive(Debug)]
pub struct CacheRegistry {
    state: RwLock<RegistryState>,
}

impl CacheRegistry {
    // == Constructors ==
    /// Creates a registry with one tier per [`Tier`], sized from `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a registry reading time from `clock`.
    pub fn with_clock(config: &Config, clock: SharedClock) -> Self {
        let tiers = Tier::ALL.map(|tier| {
            let tier_config = config.tier(tier);
            CacheStore::new(tier.as_str(), tier_config.max_size, tier_config.ttl, clock.clone())
        });

        for tier in Tier::ALL {
            let tier_config = config.tier(tier);
            debug!(
                tier = %tier,
                max_size = tier_config.max_size,
                ttl_ms = tier_config.ttl.as_millis() as u64,
                "tier configured"
            );
        }

        Self {
            state: RwLock::new(RegistryState {
                tiers,
                snapshot: StatsSnapshot::default(),
            }),
        }
    }

    // == Tier Lookup ==
    /// Maps a tier name to a tier, falling back to [`Tier::DEFAULT`].
    pub fn resolve_tier(name: &str) -> Tier {
        match name.parse::<Tier>() {
            Ok(tier) => tier,
            Err(_) => {
                debug!(requested = %name, fallback = %Tier::DEFAULT, "unknown tier, using default");
                Tier::DEFAULT
            }
        }
    }

    /// Handle onto the tier named `name`, or the default tier if unknown.
    pub fn store(&self, name: &str) -> TierHandle<'_> {
        self.tier(Self::resolve_tier(name))
    }

    /// Handle onto `tier`.
    pub fn tier(&self, tier: Tier) -> TierHandle<'_> {
        TierHandle::new(self, tier)
    }

    // == Per-tier Operations ==
    /// Looks up `key` in `tier`. `None` is a miss.
    pub async fn get(&self, tier: Tier, key: &str) -> Option<CachedValue> {
        self.state.write().await.store(tier).get(key)
    }

    /// Stores `value` under `key` in `tier`. Returns the key evicted, if any.
    pub async fn set(
        &self,
        tier: Tier,
        key: impl Into<String>,
        value: CachedValue,
        ttl: Option<Duration>,
    ) -> Option<String> {
        self.state.write().await.store(tier).set(key, value, ttl)
    }

    pub async fn has(&self, tier: Tier, key: &str) -> bool {
        self.state.write().await.store(tier).has(key)
    }

    pub async fn delete(&self, tier: Tier, key: &str) -> bool {
        self.state.write().await.store(tier).delete(key)
    }

    /// Statistics of one tier, computed now.
    pub async fn tier_stats(&self, tier: Tier) -> CacheStats {
        self.state.write().await.store(tier).stats()
    }

    /// Keys currently stored in `tier`, expired or not.
    pub async fn keys(&self, tier: Tier) -> Vec<String> {
        self.state.read().await.tiers[tier.index()].keys()
    }

    // == Typed Access ==
    /// Looks up `key` and deserializes it into `T`.
    ///
    /// A stored value of the wrong shape counts as a miss in the tier's
    /// statistics and is not touched.
    pub async fn get_as<T: DeserializeOwned>(&self, tier: Tier, key: &str) -> Option<T> {
        self.state
            .write()
            .await
            .store(tier)
            .get_with(key, |value| match T::deserialize(value) {
                Ok(typed) => Some(typed),
                Err(err) => {
                    debug!(tier = %tier, key = %key, error = %err, "cached value has unexpected shape");
                    None
                }
            })
    }

    /// Serializes `value` and stores it under `key`.
    pub async fn set_as<T: Serialize>(
        &self,
        tier: Tier,
        key: impl Into<String>,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(tier, key, value, ttl).await;
        Ok(())
    }

    // == Registry-wide Operations ==
    /// Clears one tier, or every tier when `tier` is `None`.
    pub async fn clear(&self, tier: Option<Tier>) {
        let mut state = self.state.write().await;
        match tier {
            Some(tier) => {
                state.store(tier).clear();
                info!(tier = %tier, "tier cleared");
            }
            None => {
                state.tiers.iter_mut().for_each(CacheStore::clear);
                info!("all tiers cleared");
            }
        }
    }

    /// Sweeps expired entries from every tier. Returns the number removed.
    pub async fn clear_expired_all(&self) -> usize {
        let mut state = self.state.write().await;
        state
            .tiers
            .iter_mut()
            .map(CacheStore::cleanup_expired)
            .sum()
    }

    /// Recomputes the statistics snapshot from every tier and returns it.
    pub async fn refresh_stats(&self) -> StatsSnapshot {
        let mut state = self.state.write().await;
        let tiers: Vec<CacheStats> = state.tiers.iter_mut().map(CacheStore::stats).collect();
        state.snapshot = StatsSnapshot::from_tiers(tiers);
        state.snapshot.clone()
    }

    /// The last computed snapshot. Never recomputed on read.
    pub async fn stats_snapshot(&self) -> StatsSnapshot {
        self.state.read().await.snapshot.clone()
    }

    /// Teardown: empties every tier.
    pub async fn shutdown(&self) {
        self.clear(None).await;
        info!("cache registry shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::config::TierConfig;
    use serde_json::json;

    fn registry() -> (CacheRegistry, ManualClock) {
        let clock = ManualClock::new(10_000);
        let mut config = Config::default();
        config.api = TierConfig::new(2, Duration::from_secs(60));
        (CacheRegistry::with_clock(&config, Arc::new(clock.clone())), clock)
    }

    #[tokio::test]
    async fn test_tiers_are_independent() {
        let (registry, _) = registry();

        registry.set(Tier::Api, "k", json!(1), None).await;
        registry.set(Tier::Computed, "k", json!(2), None).await;

        assert_eq!(registry.get(Tier::Api, "k").await, Some(json!(1)));
        assert_eq!(registry.get(Tier::Computed, "k").await, Some(json!(2)));
        assert_eq!(registry.get(Tier::ComponentState, "k").await, None);
    }

    #[tokio::test]
    async fn test_tier_capacities_follow_config() {
        let (registry, _) = registry();
        let stats = registry.refresh_stats().await;

        let sizes: Vec<(String, usize)> = stats
            .tiers
            .iter()
            .map(|t| (t.name.clone(), t.max_size))
            .collect();
        assert_eq!(
            sizes,
            vec![
                ("api".to_string(), 2),
                ("computed".to_string(), 100),
                ("component-state".to_string(), 30),
                ("user-preference".to_string(), 20),
            ]
        );
    }

    #[tokio::test]
    async fn test_cached_null_is_distinct_from_miss() {
        let (registry, _) = registry();

        registry.set(Tier::Api, "empty", Value::Null, None).await;

        assert_eq!(registry.get(Tier::Api, "empty").await, Some(Value::Null));
        assert_eq!(registry.get(Tier::Api, "absent").await, None);
    }

    #[tokio::test]
    async fn test_clear_one_and_all() {
        let (registry, _) = registry();
        registry.set(Tier::Api, "a", json!(1), None).await;
        registry.set(Tier::Computed, "b", json!(2), None).await;

        registry.clear(Some(Tier::Api)).await;
        assert!(!registry.has(Tier::Api, "a").await);
        assert!(registry.has(Tier::Computed, "b").await);

        registry.clear(None).await;
        registry.clear(None).await;
        assert!(!registry.has(Tier::Computed, "b").await);
    }

    #[tokio::test]
    async fn test_clear_expired_all_sweeps_every_tier() {
        let (registry, clock) = registry();
        let short = Some(Duration::from_millis(100));
        registry.set(Tier::Api, "a", json!(1), short).await;
        registry.set(Tier::Computed, "b", json!(2), short).await;
        registry.set(Tier::ComponentState, "c", json!(3), None).await;

        clock.advance(Duration::from_millis(150));

        assert_eq!(registry.clear_expired_all().await, 2);
        assert_eq!(registry.keys(Tier::ComponentState).await, vec!["c".to_string()]);
        assert!(registry.keys(Tier::Api).await.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_only_changes_on_refresh() {
        let (registry, _) = registry();

        assert!(registry.stats_snapshot().await.refreshed_at.is_none());

        registry.set(Tier::Api, "a", json!("x"), None).await;
        assert_eq!(registry.stats_snapshot().await.total_entries, 0);

        let refreshed = registry.refresh_stats().await;
        assert_eq!(refreshed.total_entries, 1);
        assert!(refreshed.refreshed_at.is_some());
        assert_eq!(registry.stats_snapshot().await.total_entries, 1);
    }

    #[tokio::test]
    async fn test_typed_access() {
        let (registry, _) = registry();

        registry
            .set_as(Tier::Computed, "pair", &(1u32, "one".to_string()), None)
            .await
            .unwrap();

        let pair: Option<(u32, String)> = registry.get_as(Tier::Computed, "pair").await;
        assert_eq!(pair, Some((1, "one".to_string())));

        let wrong: Option<bool> = registry.get_as(Tier::Computed, "pair").await;
        assert_eq!(wrong, None);

        let stats = registry.tier_stats(Tier::Computed).await;
        assert_eq!(stats.counters.hits, 1);
        assert_eq!(stats.counters.misses, 1);
        assert_eq!(stats.total_access, 1);
    }

    #[tokio::test]
    async fn test_store_lookup_falls_back_to_api() {
        let (registry, _) = registry();

        registry.store("no-such-tier").set("k", json!(true), None).await;

        assert_eq!(registry.get(Tier::Api, "k").await, Some(json!(true)));
        assert_eq!(registry.store("computed").tier(), Tier::Computed);
    }

    #[tokio::test]
    async fn test_shutdown_empties_registry() {
        let (registry, _) = registry();
        registry.set(Tier::UserPreference, "theme", json!("dark"), None).await;

        registry.shutdown().await;

        let snapshot = registry.refresh_stats().await;
        assert_eq!(snapshot.total_entries, 0);
    }
}
