//! Maintenance Task
//!
//! Background task that periodically sweeps expired entries from every tier
//! and refreshes the registry's statistics snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::registry::CacheRegistry;

/// Spawns the periodic maintenance task.
///
/// Each tick runs `clear_expired_all` and then `refresh_stats`. Both take
/// the registry lock only for the duration of the call, so a tick can land
/// between two steps of an in-flight binding but never inside one cache
/// operation.
///
/// # Arguments
/// * `registry` - Shared registry
/// * `interval` - Time between ticks; the first tick fires after one interval
///
/// # Returns
/// A JoinHandle for the spawned task. Abort it on shutdown.
///
/// # Example
/// ```ignore
/// let registry = Arc::new(CacheRegistry::new(&Config::default()));
/// let handle = spawn_maintenance_task(registry.clone(), Duration::from_secs(10));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_maintenance_task(registry: Arc<CacheRegistry>, interval: Duration) -> JoinHandle<()> {
    let period = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        info!(interval_ms = period.as_millis() as u64, "starting cache maintenance task");

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = registry.clear_expired_all().await;
            let snapshot = registry.refresh_stats().await;

            if removed > 0 {
                info!(removed, total_entries = snapshot.total_entries, "maintenance sweep removed expired entries");
            } else {
                debug!(total_entries = snapshot.total_entries, "maintenance sweep: nothing expired");
            }
            for tier in &snapshot.tiers {
                debug!(
                    tier = %tier.name,
                    size = tier.size,
                    hit_ratio = tier.request_hit_ratio(),
                    evictions = tier.counters.evictions,
                    "tier stats"
                );
            }
        }
    })
}
