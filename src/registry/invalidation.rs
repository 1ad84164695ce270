//! Invalidation Engine
//!
//! Bulk removal of keys by literal substring, in one tier or across all of
//! them. Matching looks at key text only, never at cached values.

use tracing::info;

use crate::cache::CacheStore;
use crate::registry::{CacheRegistry, CachedValue, Tier};

impl CacheRegistry {
    // == Invalidate By Pattern ==
    /// Deletes every key containing `pattern` as a literal substring, from
    /// `tier` or from every tier when `None`. Returns the number deleted.
    ///
    /// An empty pattern is contained in every key and so empties the scope.
    pub async fn invalidate_by_pattern(&self, pattern: &str, tier: Option<Tier>) -> usize {
        let removed = self
            .remove_matching(tier, |key| key.contains(pattern))
            .await;
        if removed > 0 {
            info!(pattern = %pattern, scope = %scope_name(tier), removed, "invalidated by pattern");
        }
        removed
    }

    // == Invalidate By Tags ==
    /// Deletes every key containing any of `tags`. Returns the number deleted.
    pub async fn invalidate_by_tags<S: AsRef<str>>(&self, tags: &[S], tier: Option<Tier>) -> usize {
        if tags.is_empty() {
            return 0;
        }
        let removed = self
            .remove_matching(tier, |key| tags.iter().any(|tag| key.contains(tag.as_ref())))
            .await;
        if removed > 0 {
            info!(tags = tags.len(), scope = %scope_name(tier), removed, "invalidated by tags");
        }
        removed
    }

    // == Invalidate All ==
    /// Clears `tier`, or every tier when `None`.
    pub async fn invalidate_all(&self, tier: Option<Tier>) {
        self.clear(tier).await
    }

    async fn remove_matching<F>(&self, tier: Option<Tier>, predicate: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let mut state = self.state.write().await;
        let stores: Vec<&mut CacheStore<CachedValue>> = match tier {
            Some(tier) => vec![state.store(tier)],
            None => state.tiers.iter_mut().collect(),
        };
        stores
            .into_iter()
            .map(|store| store.remove_matching(&predicate))
            .sum()
    }
}

fn scope_name(tier: Option<Tier>) -> &'static str {
    tier.map(|t| t.as_str()).unwrap_or("all")
}
