//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod handle;
mod lru;
mod snapshot;
mod stats;
mod store;


// Re-export public types
pub use entry::{ttl_from_secs, CacheEntry, TimeToLive};
pub use handle::Cache;
pub use lru::RecencyList;
pub use snapshot::{LoadOutcome, Snapshot, SnapshotEntry};
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;
