//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::config::MIN_SWEEP_INTERVAL;

// == Sweeper Handle ==
/// Owns a running sweeper task.
///
/// Dropping the handle signals the task to stop without waiting for it;
/// [`SweeperHandle::shutdown`] signals and joins.
#[derive(Debug)]
pub struct SweeperHandle {
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stops the sweeper and waits for the task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Expiry sweeper ended abnormally: {}", e);
            }
        }
        info!("Expiry sweeper stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

/// Spawns a task that removes expired entries from `store` every `interval`.
///
/// Each lock acquisition removes at most `batch` entries, so foreground
/// operations can interleave with a large sweep.
///
/// # Panics
/// Panics if called outside of a Tokio runtime.
pub fn spawn_sweeper<K, V>(
    store: Arc<Mutex<CacheStore<K, V>>>,
    interval: Duration,
    batch: usize,
) -> SweeperHandle
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let batch = batch.max(1);
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    let task = tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {:?}, batch of {}",
            interval, batch
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = sweep(&store, batch).await;
                    if removed > 0 {
                        info!("Expiry sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Expiry sweep: no expired entries found");
                    }
                }
                changed = stop_rx.changed() => {
                    // A dropped sender also means stop
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    SweeperHandle {
        stop_tx,
        task: Some(task),
    }
}

/// Runs one full sweep in batches, yielding between lock acquisitions.
async fn sweep<K, V>(store: &Mutex<CacheStore<K, V>>, batch: usize) -> usize
where
    K: Hash + Eq + Clone,
{
    let mut total = 0;
    loop {
        let removed = store.lock().cleanup_expired_batch(batch);
        total += removed;
        if removed < batch {
            return total;
        }
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_store(capacity: usize) -> Arc<Mutex<CacheStore<String, String>>> {
        Arc::new(Mutex::new(CacheStore::new(capacity, None).unwrap()))
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let store = shared_store(100);
        store.lock().put(
            "expire_soon".to_string(),
            "value".to_string(),
            Some(Duration::from_millis(50)),
        );

        let handle = spawn_sweeper(store.clone(), Duration::from_millis(100), 16);
        tokio::time::sleep(Duration::from_millis(350)).await;

        // len() does not purge, so only the sweeper can have removed it
        assert_eq!(store.lock().len(), 0, "Expired entry should have been swept");
        assert_eq!(store.lock().stats().expirations, 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweeper_preserves_valid_entries() {
        let store = shared_store(100);
        store.lock().put(
            "long_lived".to_string(),
            "value".to_string(),
            Some(Duration::from_secs(3600)),
        );
        store
            .lock()
            .put("forever".to_string(), "value".to_string(), None);

        let handle = spawn_sweeper(store.clone(), Duration::from_millis(50), 16);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.lock().len(), 2, "Valid entries should not be removed");
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweeper_drains_in_batches() {
        let store = shared_store(100);
        for i in 0..10 {
            store.lock().put(
                format!("k{}", i),
                "v".to_string(),
                Some(Duration::from_millis(10)),
            );
        }
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(sweep(&store, 3).await, 10);
        assert!(store.lock().is_empty());
    }

    #[tokio::test]
    async fn test_sweeper_with_zero_interval_keeps_running() {
        let store = shared_store(8);
        store.lock().put(
            "short".to_string(),
            "value".to_string(),
            Some(Duration::from_millis(20)),
        );

        let handle = spawn_sweeper(store.clone(), Duration::ZERO, 16);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!handle.is_finished(), "Sweeper task should still be alive");
        assert_eq!(store.lock().len(), 0);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweeper_shutdown_joins() {
        let store = shared_store(10);
        let handle = spawn_sweeper(store.clone(), Duration::from_secs(3600), 16);

        handle.shutdown().await;

        // The task released its reference to the store
        assert_eq!(Arc::strong_count(&store), 1);
    }

    #[tokio::test]
    async fn test_sweeper_stops_when_handle_dropped() {
        let store = shared_store(10);
        let handle = spawn_sweeper(store.clone(), Duration::from_secs(3600), 16);

        drop(handle);

        for _ in 0..50 {
            if Arc::strong_count(&store) == 1 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Sweeper task should exit after its handle is dropped");
    }
}
