//! Geo Cache - replicated in-memory cache nodes
//!
//! Bounded LRU caches with lazy TTL expiration, kept approximately
//! consistent by broadcasting every local write through a coordination bus.

pub mod bus;
pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod traits;

pub use bus::{CoordinationBus, ReplicationEvent};
pub use cache::CacheNode;
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweeper;
pub use traits::{Broadcast, Broadcaster, ReplicableStore};
