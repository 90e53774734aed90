//! Cache Node Module
//!
//! One location's view of the cached data. Serializes values into its store,
//! publishes local writes to the bus and applies replicated ones without
//! republishing them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::bus::ReplicationEvent;
use crate::cache::{CacheStats, CacheStore};
use crate::error::{CacheError, Result};
use crate::traits::{Broadcast, Broadcaster, ReplicableStore};

// == Cache Node ==
/// A named, bounded LRU+TTL cache wired to a [`Broadcaster`].
///
/// The store lock is never held while publishing, since the bus delivers
/// back into every subscriber including this node.
pub struct CacheNode {
    name: String,
    store: Mutex<CacheStore>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl CacheNode {
    // == Constructor ==
    /// Creates an empty node holding at most `max_entries` entries.
    ///
    /// The node publishes to `broadcaster` but is not subscribed to it; call
    /// [`Broadcaster::subscribe`] to receive replicated writes.
    pub fn new(
        name: impl Into<String>,
        max_entries: usize,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            name: name.into(),
            store: Mutex::new(CacheStore::new(max_entries)),
            broadcaster,
        }
    }

    // == Typed Access ==
    /// Serializes any `T` and writes it.
    ///
    /// A value that cannot be encoded aborts the write: nothing is stored or
    /// published, the failure is logged and counted, and the error returned.
    pub fn set_as<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
        broadcast: Broadcast,
    ) -> Result<()> {
        let serialized = self.encode(key, value)?;
        self.write(key, serialized, ttl, broadcast)
    }

    /// Reads `key` and decodes it as `T`.
    ///
    /// An entry that does not decode is reported and treated as absent; it
    /// stays in the store and its recency is not refreshed.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut store = self.lock();
        let raw = store.lookup(key)?;

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                store.promote(key);
                Some(value)
            }
            Err(e) => {
                let stats = store.stats_mut();
                stats.record_deserialization_failure();
                stats.record_miss();
                warn!(node = %self.name, key, error = %e, "failed to deserialize cached value");
                None
            }
        }
    }

    // == Maintenance ==
    /// Drops every expired entry now instead of waiting for it to be read.
    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired()
    }

    // == Length ==
    /// Returns the number of entries held, including unswept expired ones.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // == Is Empty ==
    /// Returns true if the node holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // == Contains ==
    /// Whether `key` is held, live or not yet swept. Does not touch recency.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    // == Keys By Recency ==
    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lock().keys_by_recency()
    }

    // == Stats ==
    /// Returns a snapshot of this node's counters.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    fn lock(&self) -> MutexGuard<'_, CacheStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn encode<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| {
            self.lock().stats_mut().record_serialization_failure();
            warn!(node = %self.name, key, error = %e, "failed to serialize value, write aborted");
            CacheError::Serialization {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn write(
        &self,
        key: &str,
        serialized: String,
        ttl: Duration,
        broadcast: Broadcast,
    ) -> Result<()> {
        let event = broadcast
            .should_publish()
            .then(|| ReplicationEvent::new(key, serialized.clone(), ttl));

        {
            let mut store = self.lock();
            if let Err(e) = store.insert(key.to_string(), serialized, ttl) {
                warn!(node = %self.name, key, error = %e, "write rejected");
                return Err(e);
            }
            match broadcast {
                Broadcast::Publish => store.stats_mut().record_local_write(),
                Broadcast::Suppress => store.stats_mut().record_replicated_write(),
            }
        }

        if let Some(event) = event {
            debug!(node = %self.name, key, "publishing write");
            self.broadcaster.publish(event);
        }
        Ok(())
    }
}

impl ReplicableStore for CacheNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.get_as(key)
    }

    fn set(&self, key: &str, value: &Value, ttl: Duration, broadcast: Broadcast) -> Result<()> {
        self.set_as(key, value, ttl, broadcast)
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

impl std::fmt::Debug for CacheNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheNode")
            .field("name", &self.name)
            .field("store", &*self.lock())
            .finish_non_exhaustive()
    }
}
