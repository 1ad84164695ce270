//! Binding Adapters
//!
//! Cache-aside wrappers that turn "look up, or perform the operation and
//! remember the result" into one call per kind of cached data.
//!
//! Every adapter follows the same path: derive a canonical key, return a hit
//! unless a refresh is forced, otherwise await the underlying operation and
//! store its result only if it succeeded. Failures reach the caller
//! untouched and leave the cache as it was.
//!
//! Lookup and populate are separate registry calls. Two callers missing on
//! the same key concurrently both run the operation and the later write wins.

mod api;
mod key;
mod memo;
mod persistence;
mod preferences;
mod state;

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::registry::{CacheRegistry, Tier};

pub use api::ApiCache;
pub use key::{canonical_key, canonicalize, escape_segment, memo_key};
pub use memo::Memoizer;
pub use persistence::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use preferences::{PreferenceCache, PREFERENCE_KEY_PREFIX};
pub use state::StateCache;

// == Fetch Options ==
/// Per-call knobs shared by the adapters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// TTL for the stored result; the tier default when `None`
    pub ttl: Option<Duration>,
    /// Skip the lookup and always run the operation
    pub force_refresh: bool,
}

impl FetchOptions {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            force_refresh: false,
        }
    }

    pub fn refresh() -> Self {
        Self {
            ttl: None,
            force_refresh: true,
        }
    }
}

/// Returns the cached value for `key` or runs `operation` and caches its result.
pub(crate) async fn load_through<T, F, Fut>(
    registry: &CacheRegistry,
    tier: Tier,
    key: String,
    options: FetchOptions,
    operation: F,
) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    if !options.force_refresh {
        if let Some(hit) = registry.get_as::<T>(tier, &key).await {
            debug!(tier = %tier, key = %key, "cache hit");
            return Ok(hit);
        }
    }

    debug!(tier = %tier, key = %key, forced = options.force_refresh, "cache miss, running operation");
    let value = operation().await?;
    registry.set_as(tier, key, &value, options.ttl).await?;
    Ok(value)
}
