//! Cache Handle Module
//!
//! Thread-safe, cloneable front end over [`CacheStore`].

use std::borrow::Borrow;
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::cache::snapshot::{read_snapshot, write_snapshot};
use crate::cache::{CacheStats, CacheStore, LoadOutcome, TimeToLive};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweeper, SweeperHandle};

struct Shared<K, V> {
    store: Arc<Mutex<CacheStore<K, V>>>,
    sweeper: Mutex<Option<SweeperHandle>>,
    config: CacheConfig,
}

// == Cache ==
/// LRU cache with per-entry TTL, safe to share between threads.
///
/// Every operation runs under a single exclusive lock, so the index, the
/// recency order and the statistics are always observed consistently.
/// Clones share the same underlying cache.
///
/// # Example
/// ```
/// use lrutide::Cache;
/// use std::time::Duration;
///
/// let cache = Cache::new(2, None).unwrap();
/// cache.put("a", 1, None);
/// cache.put("b", 2, Some(Duration::from_secs(30)));
/// assert_eq!(cache.get("a"), Some(1));
///
/// cache.put("c", 3, None); // evicts "b"
/// assert!(!cache.exists("b"));
/// ```
pub struct Cache<K, V> {
    shared: Arc<Shared<K, V>>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    // == Constructors ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize, default_ttl: Option<Duration>) -> Result<Self> {
        let mut config = CacheConfig::new(capacity);
        config.default_ttl = default_ttl;
        Self::with_config(config)
    }

    /// Creates a cache from a full configuration. The sweeper is not started.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        let store = CacheStore::new(config.capacity, config.default_ttl)?;
        Ok(Self {
            shared: Arc::new(Shared {
                store: Arc::new(Mutex::new(store)),
                sweeper: Mutex::new(None),
                config,
            }),
        })
    }

    // == Core Operations ==
    /// Stores a value. Returns true if a live entry for `key` was replaced.
    ///
    /// See [`CacheStore::put`] for TTL and eviction rules. Use
    /// [`crate::cache::ttl_from_secs`] to validate caller-supplied seconds.
    pub fn put(&self, key: K, value: V, ttl: Option<Duration>) -> bool {
        self.shared.store.lock().put(key, value, ttl)
    }

    /// Returns a clone of the live value for `key`, promoting it to most
    /// recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.shared.store.lock().get(key).cloned()
    }

    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.store.lock().delete(key)
    }

    /// Peeks for a live entry without changing recency or hit/miss counters.
    pub fn exists<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.store.lock().exists(key)
    }

    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<TimeToLive>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.store.lock().ttl_remaining(key)
    }

    /// Removes every expired entry and returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.shared.store.lock().cleanup_expired()
    }

    pub fn clear(&self) {
        self.shared.store.lock().clear();
    }

    // == Enumeration ==
    /// Live keys, most recently used first. Purges expired entries.
    pub fn keys(&self) -> Vec<K> {
        self.shared.store.lock().keys()
    }

    /// Live key-value pairs, most recently used first. Purges expired entries.
    pub fn items(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.shared.store.lock().items()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.shared.store.lock().stats()
    }

    pub fn reset_stats(&self) {
        self.shared.store.lock().reset_stats();
    }

    pub fn size(&self) -> usize {
        self.shared.store.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.shared.config.capacity
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.shared.config.default_ttl
    }

    // == Sweeper ==
    /// Starts the background expiry sweeper using the configured interval.
    ///
    /// Does nothing if a sweeper is already running.
    ///
    /// # Errors
    /// Returns `CacheError::Internal` when called outside a Tokio runtime.
    pub fn start_sweeper(&self) -> Result<()> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(CacheError::Internal(
                "the expiry sweeper requires a Tokio runtime".to_string(),
            ));
        }

        let mut sweeper = self.shared.sweeper.lock();
        if sweeper.as_ref().is_some_and(|s| !s.is_finished()) {
            debug!("Expiry sweeper already running");
            return Ok(());
        }

        *sweeper = Some(spawn_sweeper(
            Arc::clone(&self.shared.store),
            self.shared.config.sweep_interval,
            self.shared.config.sweep_batch,
        ));
        Ok(())
    }

    pub fn is_sweeping(&self) -> bool {
        self.shared
            .sweeper
            .lock()
            .as_ref()
            .is_some_and(|s| !s.is_finished())
    }

    /// Stops the background sweeper, if any, and waits for it to exit.
    ///
    /// The cache stays usable; calling this more than once is harmless.
    pub async fn close(&self) {
        let sweeper = self.shared.sweeper.lock().take();
        if let Some(sweeper) = sweeper {
            sweeper.shutdown().await;
        }
    }

    // == Persistence ==
    /// Writes every live entry to `path` as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()>
    where
        K: Serialize,
        V: Serialize + Clone,
    {
        let snapshot = self.shared.store.lock().snapshot();
        write_snapshot(path.as_ref(), &snapshot)
    }

    /// Replaces the cache contents with the snapshot stored at `path`.
    ///
    /// A missing file yields `LoadOutcome::NotFound`. Malformed data returns
    /// `CacheError::Persistence` and leaves the cache untouched. Entries that
    /// expired on disk are dropped.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadOutcome>
    where
        K: DeserializeOwned,
        V: DeserializeOwned + Clone,
    {
        let path = path.as_ref();
        let Some(snapshot) = read_snapshot(path)? else {
            info!("No snapshot at {}, starting empty", path.display());
            return Ok(LoadOutcome::NotFound);
        };

        let outcome = self.shared.store.lock().restore(snapshot);
        if let LoadOutcome::Loaded {
            restored,
            dropped_expired,
        } = outcome
        {
            info!(
                "Loaded {} entries from {} ({} expired entries dropped)",
                restored,
                path.display(),
                dropped_expired
            );
        }
        Ok(outcome)
    }
}
