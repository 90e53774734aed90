//! Cache Module
//!
//! Bounded LRU+TTL storage and the cache node built on top of it.

mod entry;
mod lru;
mod node;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use node::CacheNode;
pub use stats::CacheStats;
pub use store::CacheStore;
