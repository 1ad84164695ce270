//! User preferences: in-memory tier in front of a durable store.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::bindings::PreferenceStore;
use crate::error::Result;
use crate::registry::{CacheRegistry, Tier};

/// Namespace of every key this adapter writes to the durable store.
pub const PREFERENCE_KEY_PREFIX: &str = "dashboard_pref_";

// == Preference Cache ==
/// Reads fall through the `user-preference` tier, then the durable store,
/// then the caller's default. Writes go to both before returning.
///
/// Nothing coordinates two processes sharing one durable store; their
/// concurrent writes race and the last one wins.
#[derive(Debug, Clone)]
pub struct PreferenceCache {
    registry: Arc<CacheRegistry>,
    durable: Option<Arc<dyn PreferenceStore>>,
}

impl PreferenceCache {
    /// Creates a cache with no durable store behind it.
    pub fn in_memory(registry: Arc<CacheRegistry>) -> Self {
        Self {
            registry,
            durable: None,
        }
    }

    pub fn with_store(registry: Arc<CacheRegistry>, durable: Arc<dyn PreferenceStore>) -> Self {
        Self {
            registry,
            durable: Some(durable),
        }
    }

    fn durable_key(name: &str) -> String {
        format!("{PREFERENCE_KEY_PREFIX}{name}")
    }

    // == Get ==
    /// Returns the preference `name`, or `default` if neither tier nor
    /// durable store holds a readable value.
    pub async fn get<T>(&self, name: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        self.lookup(name).await.unwrap_or(default)
    }

    /// Returns the preference `name` if the tier or the durable store holds
    /// a readable value. A value found only in the durable store is copied
    /// back into the tier.
    pub async fn lookup<T>(&self, name: &str) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(value) = self.registry.get_as::<T>(Tier::UserPreference, name).await {
            return Some(value);
        }

        let value = self.read_durable::<T>(name).await?;
        if let Err(err) = self
            .registry
            .set_as(Tier::UserPreference, name, &value, None)
            .await
        {
            warn!(preference = %name, error = %err, "could not repopulate preference tier");
        }
        Some(value)
    }

    async fn read_durable<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let durable = self.durable.as_ref()?;
        let raw = match durable.read_key(&Self::durable_key(name)).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(preference = %name, error = %err, "durable preference read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(preference = %name, "preference restored from durable store");
                Some(value)
            }
            Err(err) => {
                warn!(preference = %name, error = %err, "stored preference is unreadable");
                None
            }
        }
    }

    // == Set ==
    /// Writes through to the tier and the durable store. The tier is
    /// updated even when the durable write fails; that failure is returned.
    pub async fn set<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        self.set_with_ttl(name, value, None).await.map(|_| ())
    }

    /// Like [`PreferenceCache::set`] with an explicit tier TTL. Returns the
    /// key evicted from the tier to make room, if any.
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        name: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<Option<String>> {
        let json = serde_json::to_value(value)?;
        let serialized = serde_json::to_string(&json)?;
        let evicted = self.registry.set(Tier::UserPreference, name, json, ttl).await;

        if let Some(durable) = &self.durable {
            durable
                .write_key(&Self::durable_key(name), &serialized)
                .await?;
        }
        Ok(evicted)
    }

    /// Removes the preference from both layers. Returns whether either held it.
    pub async fn remove(&self, name: &str) -> Result<bool> {
        let cached = self.registry.delete(Tier::UserPreference, name).await;
        let stored = match &self.durable {
            Some(durable) => durable.remove_key(&Self::durable_key(name)).await?,
            None => false,
        };
        Ok(cached || stored)
    }
}
