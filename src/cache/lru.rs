//! LRU Tracker Module
//!
//! Recency ordering used to pick the eviction victim.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks key recency for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Keys that were never touched again keep their insertion order, so ties
/// between untouched keys go to the oldest insert.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Moves `key` to the most-recently-used position, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        match self.position(key) {
            Some(0) => {}
            Some(idx) => {
                if let Some(existing) = self.order.remove(idx) {
                    self.order.push_front(existing);
                }
            }
            None => self.order.push_front(key.to_string()),
        }
    }

    // == Remove ==
    /// Stops tracking `key`. Returns whether it was tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(idx) => self.order.remove(idx).is_some(),
            None => false,
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently used key.
    pub fn pop_least_recent(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    // == Iterate ==
    /// Keys from least to most recently used.
    pub fn iter_least_recent_first(&self) -> impl Iterator<Item = &str> {
        self.order.iter().rev().map(String::as_str)
    }

    // == Clear ==
    /// Forgets every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    /// Returns true if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }
}
