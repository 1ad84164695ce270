//! API response caching.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::bindings::{canonical_key, load_through, FetchOptions};
use crate::registry::{CacheRegistry, Tier};

// == Api Cache ==
/// Caches responses of backend calls in the `api` tier, keyed by URL and
/// canonical query parameters.
#[derive(Debug, Clone)]
pub struct ApiCache {
    registry: Arc<CacheRegistry>,
}

impl ApiCache {
    pub fn new(registry: Arc<CacheRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the cached response for `url` + `params`, or awaits `fetch`
    /// and caches what it returns. Pass `&()` when there are no parameters.
    pub async fn fetch<T, P, F, Fut>(
        &self,
        url: &str,
        params: &P,
        options: FetchOptions,
        fetch: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        P: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let key = canonical_key(url, params)?;
        load_through(&self.registry, Tier::Api, key, options, fetch).await
    }

    /// Drops every cached response whose key contains `url`.
    pub async fn invalidate_endpoint(&self, url: &str) -> usize {
        self.registry.invalidate_by_pattern(url, Some(Tier::Api)).await
    }
}
