//! Insertion Order Module
//!
//! Tracks the order in which keys were inserted so the oldest can be evicted
//! when the cache is full.

use std::collections::BTreeMap;

// == Insertion Order ==
/// Oldest-first ordering of cache keys.
///
/// Every insertion is assigned the next sequence number; the smallest live
/// number is the eviction candidate. Re-inserting a key means removing its old
/// sequence number and pushing it again, which moves it to the back.
#[derive(Debug)]
pub struct InsertionOrder<K> {
    /// Sequence number -> key, ascending = oldest first
    order: BTreeMap<u64, K>,
    /// Next sequence number to hand out
    next_seq: u64,
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> InsertionOrder<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    // == Push ==
    /// Appends a key at the back (newest) and returns its sequence number.
    pub fn push(&mut self, key: K) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key);
        seq
    }

    // == Remove ==
    /// Removes the key registered under `seq`.
    pub fn remove(&mut self, seq: u64) -> Option<K> {
        self.order.remove(&seq)
    }

    // == Pop Oldest ==
    /// Removes and returns the oldest key.
    ///
    /// Returns None if the tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<K> {
        self.order.pop_first().map(|(_, key)| key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forgets every key. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.order.clear();
    }
}
