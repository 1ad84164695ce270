//! Dashboard Cache - multi-tier client cache for the scraping dashboard
//!
//! Named TTL + LRU tiers behind one registry, with substring/tag
//! invalidation, periodic statistics and cache-aside binding adapters.

pub mod api;
pub mod bindings;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod tasks;

pub use api::AppState;
pub use config::{Config, TierConfig};
pub use error::{CacheError, Result};
pub use registry::{CacheRegistry, StatsSnapshot, Tier, TierHandle};
pub use tasks::{spawn_maintenance_task, Debouncer};
