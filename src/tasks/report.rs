//! Metrics Report Task
//!
//! Periodically logs cache size, activity counters and process memory, so a
//! leak (or its absence) is visible in the logs.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheStore, Clock};
use crate::memory::MemoryProbe;
use crate::models::StatsResponse;

/// Takes one reading of the cache and process memory.
///
/// The read lock is released before the memory probe runs.
pub async fn collect_report<K, V, C>(
    cache: &RwLock<CacheStore<K, V, C>>,
    probe: &mut MemoryProbe,
) -> StatsResponse
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    let (stats, capacity) = {
        let cache_guard = cache.read().await;
        (cache_guard.stats(), cache_guard.capacity())
    };

    StatsResponse::from_stats(&stats, capacity, probe.resident_bytes())
}

/// Spawns a background task that logs a [`StatsResponse`] every `interval`.
pub fn spawn_report_task<K, V, C>(
    cache: Arc<RwLock<CacheStore<K, V, C>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    C: Clock + 'static,
{
    tokio::spawn(async move {
        info!("Starting metrics report task with interval of {:?}", interval);
        let mut probe = MemoryProbe::new();

        loop {
            tokio::time::sleep(interval).await;

            let report = collect_report(&cache, &mut probe).await;
            info!(
                entries = report.total_entries,
                capacity = report.capacity,
                hits = report.hits,
                misses = report.misses,
                evictions = report.evictions,
                expirations = report.expirations,
                memory_bytes = report.memory_bytes,
                "Cache metrics"
            );
        }
    })
}
