//! Transient component state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::bindings::{escape_segment, load_through, FetchOptions};
use crate::error::Result;
use crate::registry::{CacheRegistry, Tier};

// == State Cache ==
/// Short-lived UI state in the `component-state` tier, keyed
/// `component:{component_id}:{state_key}` with `:` escaped in the id.
#[derive(Debug, Clone)]
pub struct StateCache {
    registry: Arc<CacheRegistry>,
}

impl StateCache {
    pub fn new(registry: Arc<CacheRegistry>) -> Self {
        Self { registry }
    }

    pub fn key(component_id: &str, state_key: &str) -> String {
        format!("{}{state_key}", Self::component_tag(component_id))
    }

    fn component_tag(component_id: &str) -> String {
        format!("component:{}:", escape_segment(component_id))
    }

    pub async fn get<T: DeserializeOwned>(&self, component_id: &str, state_key: &str) -> Option<T> {
        self.registry
            .get_as(Tier::ComponentState, &Self::key(component_id, state_key))
            .await
    }

    pub async fn set<T: Serialize>(
        &self,
        component_id: &str,
        state_key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.registry
            .set_as(Tier::ComponentState, Self::key(component_id, state_key), value, ttl)
            .await
    }

    pub async fn remove(&self, component_id: &str, state_key: &str) -> bool {
        self.registry
            .delete(Tier::ComponentState, &Self::key(component_id, state_key))
            .await
    }

    /// Drops all state of one component. Returns the number of keys removed.
    pub async fn clear_component(&self, component_id: &str) -> usize {
        self.registry
            .invalidate_by_tags(&[Self::component_tag(component_id)], Some(Tier::ComponentState))
            .await
    }

    /// Returns cached state or awaits `load` and caches its result.
    pub async fn load<T, F, Fut>(
        &self,
        component_id: &str,
        state_key: &str,
        options: FetchOptions,
        load: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let key = Self::key(component_id, state_key);
        load_through(&self.registry, Tier::ComponentState, key, options, load).await
    }
}
