//! Cache Store Module
//!
//! Main cache engine combining a hash index with the recency list and a
//! time-ordered expiry index.
//!
//! `CacheStore` is single-threaded; [`crate::cache::Cache`] wraps it behind a
//! lock for concurrent use.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, RecencyList, StatsRecorder, TimeToLive};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// LRU cache with per-entry TTL.
///
/// Invariants:
/// - `index`, `recency` and the reported size always agree.
/// - `expiry` holds exactly one `(expires_at, slot)` pair per live entry that
///   has an expiration.
pub struct CacheStore<K, V> {
    /// Key to slot index
    index: HashMap<K, usize>,
    /// Entry storage and access order
    recency: RecencyList<K, V>,
    /// Entries with a TTL, ordered by expiration instant
    expiry: BTreeSet<(Instant, usize)>,
    /// Performance statistics
    stats: StatsRecorder,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied when a put does not specify one
    default_ttl: Option<Duration>,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize, default_ttl: Option<Duration>) -> Result<Self> {
        if capacity < 1 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity),
            recency: RecencyList::with_capacity(capacity),
            expiry: BTreeSet::new(),
            stats: StatsRecorder::new(),
            capacity,
            default_ttl,
        })
    }

    // == Put ==
    /// Stores a key-value pair.
    ///
    /// `ttl` overrides the default TTL; a zero TTL stores an entry that is
    /// already expired. An existing entry for the key is overwritten
    /// (value, timestamps and expiry) and becomes the most recently used.
    /// If the key is new and the cache is full, the least recently used
    /// entry is evicted first.
    ///
    /// Returns true if a live entry was replaced.
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>) -> bool {
        self.stats.record_put();
        let entry = CacheEntry::new(key, value, ttl.or(self.default_ttl));
        self.insert_entry(entry)
    }

    /// Inserts a fully built entry, applying overwrite and eviction rules.
    pub(crate) fn insert_entry(&mut self, entry: CacheEntry<K, V>) -> bool {
        if let Some(&idx) = self.index.get(&entry.key) {
            let new_expiry = entry.expires_at;
            let Some(slot) = self.recency.get_mut(idx) else {
                return false;
            };
            let old = std::mem::replace(slot, entry);

            let replaced_live = !old.is_expired();
            if !replaced_live {
                self.stats.record_expiration();
            }
            if let Some(at) = old.expires_at {
                self.expiry.remove(&(at, idx));
            }
            if let Some(at) = new_expiry {
                self.expiry.insert((at, idx));
            }
            self.recency.move_to_front(idx);
            return replaced_live;
        }

        if self.index.len() >= self.capacity {
            self.evict_lru();
        }

        let key = entry.key.clone();
        let expires_at = entry.expires_at;
        let idx = self.recency.push_front(entry);
        self.index.insert(key, idx);
        if let Some(at) = expires_at {
            self.expiry.insert((at, idx));
        }
        false
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A live entry counts as a hit and becomes the most recently used.
    /// Missing keys count as misses. Expired entries are removed and count as
    /// both a miss and an expiration.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(idx) = self.lookup_live(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.recency.move_to_front(idx);
        self.recency.get(idx).map(|entry| &entry.value)
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns true only if a live entry was removed. An expired entry found
    /// here is purged and counted as an expiration, not a delete.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.lookup_live(key) {
            Some(idx) => {
                self.remove_slot(idx);
                self.stats.record_delete();
                true
            }
            None => false,
        }
    }

    // == Exists ==
    /// Checks whether a live entry exists without touching recency or
    /// hit/miss counters.
    pub fn exists<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup_live(key).is_some()
    }

    // == TTL Remaining ==
    /// Returns the remaining lifetime of a live entry, or None if the key is
    /// missing or expired.
    pub fn ttl_remaining<Q>(&mut self, key: &Q) -> Option<TimeToLive>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.lookup_live(key)?;
        self.recency.get(idx).map(|entry| entry.time_to_live())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.cleanup_expired_batch(usize::MAX)
    }

    /// Removes at most `limit` expired entries, oldest expiration first.
    ///
    /// Live entries are never touched, regardless of their recency.
    pub fn cleanup_expired_batch(&mut self, limit: usize) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        while removed < limit {
            match self.expiry.first() {
                Some(&(at, _)) if at <= now => {}
                _ => break,
            }
            let Some((_, idx)) = self.expiry.pop_first() else {
                break;
            };
            if let Some(entry) = self.recency.remove(idx) {
                self.index.remove(&entry.key);
                self.stats.record_expiration();
                removed += 1;
            }
        }

        removed
    }

    /// Returns true if at least one entry is past its expiration.
    pub fn has_expired(&self) -> bool {
        matches!(self.expiry.first(), Some(&(at, _)) if at <= Instant::now())
    }

    // == Clear ==
    /// Removes every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.recency.clear();
        self.expiry.clear();
    }

    // == Keys / Items ==
    /// Purges expired entries, then returns the live keys from most to least
    /// recently used.
    pub fn keys(&mut self) -> Vec<K> {
        self.cleanup_expired();
        self.recency.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Purges expired entries, then returns the live key-value pairs from
    /// most to least recently used.
    pub fn items(&mut self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.cleanup_expired();
        self.recency
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }

    /// Purges expired entries, then returns the live entries from most to
    /// least recently used.
    pub(crate) fn live_entries(&mut self) -> impl Iterator<Item = &CacheEntry<K, V>> {
        self.cleanup_expired();
        self.recency.iter()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len(), self.capacity)
    }

    /// Zeroes all counters without touching the cached entries.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    // == Length ==
    /// Returns the current number of entries, including expired entries not
    /// yet purged.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.index.len(), self.recency.len());
        self.recency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recency.is_empty()
    }

    /// Resolves `key` to a live slot, purging it if it has expired.
    fn lookup_live<Q>(&mut self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        let expired = self
            .recency
            .get(idx)
            .map_or(true, |entry| entry.is_expired());

        if expired {
            self.remove_slot(idx);
            self.stats.record_expiration();
            debug!("Lazily expired entry in slot {}", idx);
            return None;
        }
        Some(idx)
    }

    fn evict_lru(&mut self) {
        if let Some(idx) = self.recency.back() {
            self.remove_slot(idx);
            self.stats.record_eviction();
            debug!("Evicted least recently used entry from slot {}", idx);
        }
    }

    fn remove_slot(&mut self, idx: usize) -> Option<CacheEntry<K, V>> {
        let entry = self.recency.remove(idx)?;
        self.index.remove(&entry.key);
        if let Some(at) = entry.expires_at {
            self.expiry.remove(&(at, idx));
        }
        Some(entry)
    }
}
