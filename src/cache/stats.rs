//! Cache Statistics Module
//!
//! Per-node counters. These are also the side channel through which
//! swallowed failures (bad values, unreadable entries) are reported.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that returned a live, readable value
    pub hits: u64,
    /// Reads that found nothing (absent, expired or unreadable)
    pub misses: u64,
    /// Entries dropped by the LRU policy
    pub evictions: u64,
    /// Entries dropped because their deadline passed
    pub expirations: u64,
    /// Writes that originated at this node
    pub local_writes: u64,
    /// Writes applied on behalf of the bus
    pub replicated_writes: u64,
    /// Writes aborted because the value could not be encoded
    pub serialization_failures: u64,
    /// Reads that found an entry that could not be decoded
    pub deserialization_failures: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_local_write(&mut self) {
        self.local_writes += 1;
    }

    pub fn record_replicated_write(&mut self) {
        self.replicated_writes += 1;
    }

    pub fn record_serialization_failure(&mut self) {
        self.serialization_failures += 1;
    }

    pub fn record_deserialization_failure(&mut self) {
        self.deserialization_failures += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_write_counters() {
        let mut stats = CacheStats::new();
        stats.record_local_write();
        stats.record_replicated_write();
        stats.record_replicated_write();
        stats.record_serialization_failure();

        assert_eq!(stats.local_writes, 1);
        assert_eq!(stats.replicated_writes, 2);
        assert_eq!(stats.serialization_failures, 1);
    }

    #[test]
    fn test_stats_serializes() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_expirations(3);
        stats.set_total_entries(7);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["evictions"], 1);
        assert_eq!(json["expirations"], 3);
        assert_eq!(json["total_entries"], 7);
    }
}
