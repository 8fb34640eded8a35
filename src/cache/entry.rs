//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use crate::cache::clock::millis;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (clock milliseconds)
    pub created_at: u64,
    /// Absolute expiration timestamp (clock milliseconds)
    pub expires_at: u64,
    /// Position in the insertion order, used for capacity eviction
    pub seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped at `now` that expires after `ttl`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now` - Current clock reading in milliseconds
    /// * `ttl` - Time to live
    /// * `seq` - Insertion sequence number
    pub fn new(value: V, now: u64, ttl: Duration, seq: u64) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(millis(ttl)),
            seq,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at clock reading `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so a
    /// fully elapsed TTL is never served.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at clock reading `now`.
    ///
    /// Returns `Duration::ZERO` once the entry has expired.
    pub fn ttl_remaining_at(&self, now: u64) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(now))
    }
}
