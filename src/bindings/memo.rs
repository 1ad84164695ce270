//! Memoization of derived values.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::bindings::key::memo_base;
use crate::bindings::{load_through, memo_key, FetchOptions};
use crate::registry::{CacheRegistry, Tier};

// == Memoizer ==
/// Remembers results of pure computations in the `computed` tier, keyed by
/// a name and the computation's dependencies.
#[derive(Debug, Clone)]
pub struct Memoizer {
    registry: Arc<CacheRegistry>,
}

impl Memoizer {
    pub fn new(registry: Arc<CacheRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the remembered result for (`name`, `deps`) or runs `compute`.
    /// A failed computation is returned as-is and nothing is remembered.
    pub async fn memoize<T, D, F>(
        &self,
        name: &str,
        deps: &D,
        ttl: Option<Duration>,
        compute: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        D: Serialize + ?Sized,
        F: FnOnce() -> anyhow::Result<T>,
    {
        let key = memo_key(name, deps)?;
        let options = FetchOptions {
            ttl,
            force_refresh: false,
        };
        load_through(&self.registry, Tier::Computed, key, options, move || {
            std::future::ready(compute())
        })
        .await
    }

    /// Forgets every remembered result of `name`.
    pub async fn forget(&self, name: &str) -> usize {
        let base = memo_base(name);
        let with_deps = self
            .registry
            .invalidate_by_tags(&[format!("{base}:")], Some(Tier::Computed))
            .await;
        let bare = self.registry.delete(Tier::Computed, &base).await;
        with_deps + usize::from(bare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::cell::Cell;

    fn memoizer() -> (Memoizer, Arc<CacheRegistry>) {
        let registry = Arc::new(CacheRegistry::new(&Config::default()));
        (Memoizer::new(registry.clone()), registry)
    }

    #[tokio::test]
    async fn test_same_deps_compute_once() {
        let (memo, _) = memoizer();
        let runs = Cell::new(0);
        let samples = [3.0, 4.0, 5.0];

        for _ in 0..2 {
            let mean: f64 = memo
                .memoize("mean", &samples, None, || {
                    runs.set(runs.get() + 1);
                    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
                })
                .await
                .unwrap();
            assert_eq!(mean, 4.0);
        }

        assert_eq!(runs.get(), 1);
    }

    #[tokio::test]
    async fn test_different_deps_compute_again() {
        let (memo, registry) = memoizer();

        let a: u32 = memo.memoize("double", &[2], None, || Ok(4)).await.unwrap();
        let b: u32 = memo.memoize("double", &[3], None, || Ok(6)).await.unwrap();

        assert_eq!((a, b), (4, 6));
        assert_eq!(registry.keys(Tier::Computed).await.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_computation_is_not_remembered() {
        let (memo, registry) = memoizer();

        let err = memo
            .memoize::<u32, _, _>("ratio", &(1, 0), None, || anyhow::bail!("division by zero"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "division by zero");
        assert!(registry.keys(Tier::Computed).await.is_empty());
    }

    #[tokio::test]
    async fn test_forget_ignores_names_with_colons() {
        let (memo, registry) = memoizer();
        memo.memoize("a", &1, None, || Ok(1)).await.unwrap();
        memo.memoize("a:b", &1, None, || Ok(2)).await.unwrap();

        assert_eq!(memo.forget("a").await, 1);
        let again: u32 = memo
            .memoize("a:b", &1, None, || anyhow::bail!("should be remembered"))
            .await
            .unwrap();
        assert_eq!(again, 2);
        assert_eq!(registry.keys(Tier::Computed).await.len(), 1);
    }

    #[tokio::test]
    async fn test_forget_drops_only_named_results() {
        let (memo, registry) = memoizer();
        memo.memoize("totals", &1, None, || Ok(1)).await.unwrap();
        memo.memoize("totals", &2, None, || Ok(2)).await.unwrap();
        memo.memoize("totals", &(), None, || Ok(0)).await.unwrap();
        memo.memoize("totals_by_day", &1, None, || Ok(3)).await.unwrap();

        assert_eq!(memo.forget("totals").await, 3);
        assert_eq!(
            registry.keys(Tier::Computed).await,
            vec!["memo:totals_by_day:1".to_string()]
        );
    }
}
