//! lrutide - A thread-safe in-memory LRU cache with TTL expiration
//!
//! Combines least-recently-used eviction with per-entry time-to-live,
//! lazy and background expiry, hit/miss statistics and JSON snapshots.
//! A small HTTP server is included as the `lrutide` binary.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{ttl_from_secs, Cache, CacheStats, LoadOutcome, TimeToLive};
pub use config::{CacheConfig, Config};
pub use error::{CacheError, Result};
