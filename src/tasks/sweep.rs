//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries, so memory
//! is reclaimed even for keys that are never read again.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, Clock};

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The task sleeps for the interval, then takes the write lock only for the
/// sweep itself. A slow sweep simply delays the next one.
///
/// # Returns
/// A JoinHandle for the spawned task, which is aborted during graceful
/// shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheStore::new(1000, Duration::from_secs(300))));
/// let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<K, V, C>(
    cache: Arc<RwLock<CacheStore<K, V, C>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    C: Clock + 'static,
{
    tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut cache_guard = cache.write().await;
                let removed = cache_guard.sweep();
                (removed, cache_guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "TTL sweep: removed expired entries");
            } else {
                debug!(remaining, "TTL sweep: no expired entries found");
            }
        }
    })
}
