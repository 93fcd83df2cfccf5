//! Bounded in-memory cache of ranked result sets.
//!
//! Keys are the trimmed, lower-cased query, so `"Spotify"` and
//! `"  spotify "` share one entry. When the entry count exceeds the
//! capacity, the oldest-inserted entries are removed in one batch.
//! Overwriting an existing key does not move it: this is a size guard,
//! not an LRU. Entries have no TTL.

use std::collections::{HashMap, VecDeque};

use crate::types::ScoredResultSet;

/// Normalise a raw query into a cache key.
pub fn cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Insertion-ordered result cache with batch eviction.
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    evict_batch: usize,
    entries: HashMap<String, ScoredResultSet>,
    order: VecDeque<String>,
}

impl ResultCache {
    /// Create a cache that evicts `evict_batch` entries once it holds more
    /// than `capacity`.
    pub fn new(capacity: usize, evict_batch: usize) -> Self {
        Self {
            capacity,
            evict_batch,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Look up the set stored for `query`.
    pub fn get(&self, query: &str) -> Option<&ScoredResultSet> {
        self.entries.get(&cache_key(query))
    }

    /// Insert or overwrite the set for `query`, evicting if over capacity.
    pub fn put(&mut self, query: &str, set: ScoredResultSet) {
        let key = cache_key(query);
        if !self.entries.contains_key(&key) {
            self.order.push_back(key.clone());
        }
        self.entries.insert(key, set);

        if self.entries.len() > self.capacity {
            self.evict_oldest();
        }
    }

    /// Returns `true` if an entry exists for `query`.
    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(&cache_key(query))
    }

    /// Number of cached sets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached keys, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn evict_oldest(&mut self) {
        let count = self.evict_batch.min(self.order.len());
        for key in self.order.drain(..count) {
            self.entries.remove(&key);
        }
        tracing::debug!(evicted = count, remaining = self.entries.len(), "result cache evicted");
    }
}
