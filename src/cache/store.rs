//! Cache Store Module
//!
//! Bounded map of serialized values combining HashMap storage with LRU
//! tracking and lazy TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded storage with LRU eviction and TTL support.
///
/// The store never looks inside the values it holds. Expired entries stay
/// in place until they are read, purged, or evicted.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Insert ==
    /// Stores a serialized value expiring `ttl` from now.
    ///
    /// Overwriting an existing key never evicts. Otherwise, if the store is
    /// full, exactly one entry (the least recently used) is evicted first.
    /// Fails with [`CacheError::CacheFull`] only when capacity is zero, in
    /// which case nothing is mutated.
    ///
    /// Returns the evicted key, if any.
    pub fn insert(
        &mut self,
        key: String,
        serialized_value: String,
        ttl: Duration,
    ) -> Result<Option<String>> {
        let mut evicted = None;

        if self.entries.remove(&key).is_none() && self.entries.len() >= self.max_entries {
            match self.lru.pop_least_recent() {
                Some(victim) => {
                    self.entries.remove(&victim);
                    self.stats.record_eviction();
                    debug!(key = %victim, "evicted least recently used entry");
                    evicted = Some(victim);
                }
                None => return Err(CacheError::CacheFull(key)),
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(serialized_value, ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(evicted)
    }

    // == Lookup ==
    /// Returns the stored representation of a live entry without changing
    /// its recency.
    ///
    /// An expired entry is removed and reported as absent. Absent and
    /// expired lookups count as misses; the caller decides whether the
    /// returned value is a hit (see [`promote`](Self::promote)).
    pub fn lookup(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.serialized_value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.evict_expired(key);
            debug!(key, "lazily expired entry on read");
        }
        self.stats.record_miss();
        None
    }

    // == Promote ==
    /// Records a successful read: moves `key` to the most-recently-used
    /// position and counts a hit.
    pub fn promote(&mut self, key: &str) {
        if self.entries.contains_key(key) {
            self.lru.touch(key);
            self.stats.record_hit();
        }
    }

    // == Remove ==
    /// Deletes `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Purge Expired ==
    /// Removes every expired entry. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Utc::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.evict_expired(key);
        }
        expired_keys.len()
    }

    // == Contains ==
    /// Whether `key` is held, live or not yet swept.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Keys By Recency ==
    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lru
            .iter_least_recent_first()
            .map(str::to_string)
            .collect()
    }

    // == Length ==
    /// Returns the current number of entries, including unswept expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the counters with an up-to-date entry count.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    fn evict_expired(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const TTL: Duration = Duration::from_secs(300);

    fn filled(max_entries: usize, keys: &[&str]) -> CacheStore {
        let mut store = CacheStore::new(max_entries);
        for key in keys {
            store.insert(key.to_string(), format!("\"{key}\""), TTL).unwrap();
        }
        store
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(10);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut store = filled(10, &["key1"]);

        assert_eq!(store.lookup("key1").as_deref(), Some("\"key1\""));
        assert_eq!(store.lookup("missing"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let mut store = filled(2, &["a", "b"]);

        let evicted = store.insert("a".to_string(), "2".to_string(), TTL).unwrap();

        assert_eq!(evicted, None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("a").as_deref(), Some("2"));
        assert_eq!(store.keys_by_recency(), vec!["b", "a"]);
    }

    #[test]
    fn test_evicts_least_recent_when_full() {
        let mut store = filled(3, &["a", "b", "c"]);

        let evicted = store.insert("d".to_string(), "4".to_string(), TTL).unwrap();

        assert_eq!(evicted.as_deref(), Some("a"));
        assert_eq!(store.len(), 3);
        assert!(!store.contains("a"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_lookup_does_not_promote() {
        let mut store = filled(2, &["a", "b"]);

        store.lookup("a");
        store.insert("c".to_string(), "3".to_string(), TTL).unwrap();

        assert!(!store.contains("a"));
        assert!(store.contains("b"));
    }

    #[test]
    fn test_promote_refreshes_recency() {
        let mut store = filled(2, &["a", "b"]);

        store.promote("a");
        store.insert("c".to_string(), "3".to_string(), TTL).unwrap();

        assert!(store.contains("a"));
        assert!(!store.contains("b"));
        assert_eq!(store.stats().hits, 1);
    }

    #[test]
    fn test_zero_capacity_rejects_writes() {
        let mut store = CacheStore::new(0);

        let result = store.insert("a".to_string(), "1".to_string(), TTL);

        assert_eq!(result, Err(CacheError::CacheFull("a".to_string())));
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_entry_removed_on_lookup() {
        let mut store = CacheStore::new(10);
        store.insert("a".to_string(), "1".to_string(), Duration::ZERO).unwrap();
        assert_eq!(store.len(), 1);

        assert_eq!(store.lookup("a"), None);
        assert_eq!(store.len(), 0);

        let stats = store.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = filled(10, &["a", "b", "c"]);

        assert!(store.remove("b"));
        assert!(!store.remove("b"));
        assert_eq!(store.keys_by_recency(), vec!["a", "c"]);

        store.clear();
        assert!(store.is_empty());
        assert!(store.keys_by_recency().is_empty());
        assert_eq!(store.stats().total_entries, 0);
    }

    #[test]
    fn test_purge_expired() {
        let mut store = CacheStore::new(10);
        store.insert("short".to_string(), "1".to_string(), Duration::from_millis(50)).unwrap();
        store.insert("long".to_string(), "2".to_string(), TTL).unwrap();

        sleep(Duration::from_millis(100));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.contains("long"));
        assert_eq!(store.keys_by_recency(), vec!["long"]);
    }
}
