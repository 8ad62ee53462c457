//! Snapshot Module
//!
//! Persisted-state layout and JSON save/load for a cache.
//!
//! Expiry is stored as wall-clock time and re-validated against the current
//! time on load; entries that expired while on disk are dropped silently.

use std::hash::Hash;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::{CacheEntry, CacheStore};
use crate::error::{CacheError, Result};

// == Snapshot ==
/// On-disk representation of a cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<K, V> {
    pub capacity: usize,
    pub default_ttl_secs: Option<f64>,
    /// Live entries, most recently used first
    pub entries: Vec<SnapshotEntry<K, V>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry<K, V> {
    pub key: K,
    pub value: V,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

// == Load Outcome ==
/// Result of loading a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The snapshot replaced the cache contents
    Loaded {
        restored: usize,
        dropped_expired: usize,
    },
    /// No snapshot file exists; the cache was left untouched
    NotFound,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Snapshot ==
    /// Purges expired entries and captures the remaining ones.
    pub fn snapshot(&mut self) -> Snapshot<K, V> {
        let now = Instant::now();
        let wall_now = Utc::now();
        let capacity = self.capacity();
        let default_ttl_secs = self.default_ttl().map(|ttl| ttl.as_secs_f64());

        let entries = self
            .live_entries()
            .map(|entry| SnapshotEntry {
                key: entry.key.clone(),
                value: entry.value.clone(),
                created_at: entry.created_at,
                expires_at: entry
                    .expires_at
                    .and_then(|at| to_wall_clock(at, now, wall_now)),
            })
            .collect();

        Snapshot {
            capacity,
            default_ttl_secs,
            entries,
        }
    }

    // == Restore ==
    /// Replaces the cache contents with the live entries of `snapshot`.
    ///
    /// Recency order is preserved. If the snapshot holds more live entries
    /// than this cache can, only the most recently used ones are kept.
    /// Statistics are not touched.
    pub fn restore(&mut self, snapshot: Snapshot<K, V>) -> LoadOutcome {
        let now = Instant::now();
        let wall_now = Utc::now();
        let total = snapshot.entries.len();

        let live: Vec<CacheEntry<K, V>> = snapshot
            .entries
            .into_iter()
            .filter_map(|saved| {
                let expires_at = match saved.expires_at {
                    Some(at) => Some(to_instant(at, now, wall_now)?),
                    None => None,
                };
                Some(CacheEntry {
                    key: saved.key,
                    value: saved.value,
                    created_at: saved.created_at,
                    expires_at,
                })
            })
            .collect();
        let dropped_expired = total - live.len();

        self.clear();
        let keep = live.len().min(self.capacity());
        for entry in live.into_iter().take(keep).rev() {
            self.insert_entry(entry);
        }

        LoadOutcome::Loaded {
            restored: self.len(),
            dropped_expired,
        }
    }
}

/// Maps a monotonic instant to wall-clock time. None if unrepresentable.
fn to_wall_clock(at: Instant, now: Instant, wall_now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let remaining = chrono::Duration::from_std(at.saturating_duration_since(now)).ok()?;
    wall_now.checked_add_signed(remaining)
}

/// Maps a wall-clock expiry back to an instant. None if already expired.
fn to_instant(at: DateTime<Utc>, now: Instant, wall_now: DateTime<Utc>) -> Option<Instant> {
    let remaining: Duration = (at - wall_now).to_std().ok()?;
    if remaining.is_zero() {
        return None;
    }
    now.checked_add(remaining)
}

// == File I/O ==
/// Writes `snapshot` as JSON, replacing any previous file atomically.
pub(crate) fn write_snapshot<K, V>(path: &Path, snapshot: &Snapshot<K, V>) -> Result<()>
where
    K: Serialize,
    V: Serialize,
{
    let bytes = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| CacheError::Persistence(format!("failed to encode snapshot: {}", e)))?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes).map_err(|e| {
        CacheError::Persistence(format!("failed to write {}: {}", tmp.display(), e))
    })?;
    std::fs::rename(&tmp, path).map_err(|e| {
        CacheError::Persistence(format!("failed to replace {}: {}", path.display(), e))
    })?;

    info!(
        "Saved {} entries to snapshot {}",
        snapshot.entries.len(),
        path.display()
    );
    Ok(())
}

/// Reads and parses a snapshot file. Ok(None) if the file does not exist.
pub(crate) fn read_snapshot<K, V>(path: &Path) -> Result<Option<Snapshot<K, V>>>
where
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CacheError::Persistence(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_slice(&bytes).map(Some).map_err(|e| {
        warn!("Ignoring malformed snapshot {}: {}", path.display(), e);
        CacheError::Persistence(format!("malformed snapshot {}: {}", path.display(), e))
    })
}
