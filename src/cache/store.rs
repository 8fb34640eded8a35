//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order tracking,
//! capacity eviction and TTL expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, Clock, InsertionOrder, SystemClock};

// == Cache Store ==
/// Bounded key-value store with per-entry expiration.
///
/// Holds at most `capacity` entries. When a new key arrives and the store is
/// full, the oldest inserted entry is evicted. Expired entries are never
/// returned: [`get`](Self::get) drops them lazily and [`sweep`](Self::sweep)
/// drops them in bulk.
#[derive(Debug)]
pub struct CacheStore<K, V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Oldest-first insertion order
    order: InsertionOrder<K>,
    /// Activity counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied when a put does not specify one
    default_ttl: Duration,
    /// Time source
    clock: C,
}

impl<K, V> CacheStore<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore on the system clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `default_ttl` - TTL for entries stored without an explicit one
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self::with_clock(capacity, default_ttl, SystemClock)
    }
}

impl<K, V, C> CacheStore<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates a new CacheStore reading time from `clock`.
    pub fn with_clock(capacity: usize, default_ttl: Duration, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            capacity,
            default_ttl,
            clock,
        }
    }

    // == Put ==
    /// Stores a value, expiring after `ttl` (or the default TTL).
    ///
    /// Overwriting an existing key replaces its value and expiration and moves
    /// it to the back of the eviction order without changing the size. A new
    /// key arriving at a full store evicts the oldest entry first.
    ///
    /// Returns the key evicted to make room, if any. A store with capacity 0
    /// keeps nothing.
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>) -> Option<K> {
        if self.capacity == 0 {
            return None;
        }

        let now = self.clock.now_ms();
        let ttl = ttl.unwrap_or(self.default_ttl);

        let mut evicted = None;
        if let Some(previous) = self.entries.remove(&key) {
            self.order.remove(previous.seq);
        } else if self.entries.len() >= self.capacity {
            evicted = self.evict_oldest();
        }

        let seq = self.order.push(key.clone());
        self.entries.insert(key, CacheEntry::new(value, now, ttl, seq));
        self.stats.set_total_entries(self.entries.len());

        evicted
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Returns None if the key is absent or expired. An expired entry is
    /// removed as a side effect. Both cases count as misses.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
            Some(_) => {}
            None => {
                self.stats.record_miss();
                return None;
            }
        }

        // Lazy expiration
        self.remove_entry(key);
        self.stats.record_expirations(1);
        self.stats.record_miss();
        None
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    // == Sweep ==
    /// Removes every expired entry, whether or not it is ever read again.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut expired = Vec::new();

        self.entries.retain(|_, entry| {
            if entry.is_expired_at(now) {
                expired.push(entry.seq);
                false
            } else {
                true
            }
        });

        for seq in &expired {
            self.order.remove(*seq);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    // == Clear ==
    /// Removes all entries. Returns the number of entries removed.
    ///
    /// Counters other than the entry count are kept.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
        removed
    }

    // == Time To Live ==
    /// Returns the remaining lifetime of a live entry.
    ///
    /// Does not remove expired entries and does not touch the counters.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining_at(now))
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries.
    ///
    /// Entries that expired but were not yet read or swept are still counted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn evict_oldest(&mut self) -> Option<K> {
        let key = self.order.pop_oldest()?;
        self.entries.remove(&key);
        self.stats.record_eviction();
        Some(key)
    }

    fn remove_entry<Q>(&mut self, key: &Q) -> Option<CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.order.remove(entry.seq);
        self.stats.set_total_entries(self.entries.len());
        Some(entry)
    }
}
