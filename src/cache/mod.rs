//! Cache Module
//!
//! Single-tier cache engine: TTL expiration, LRU eviction and usage statistics.

mod clock;
mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SharedClock, SystemClock};
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::{CacheCounters, CacheStats};
pub use store::CacheStore;

// == Public Constants ==
/// Fixed per-entry bookkeeping cost added to the memory estimate, in bytes
pub const ENTRY_OVERHEAD_BYTES: usize = 64;
