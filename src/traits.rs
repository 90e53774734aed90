//! Capability contracts between cache nodes and the coordination bus.
//!
//! A node only knows that something can [`Broadcaster::publish`] its writes;
//! the bus only knows that each subscriber can [`ReplicableStore::set`].
//! Concrete types are wired together through constructor injection.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::bus::ReplicationEvent;
use crate::error::Result;

// == Broadcast Flag ==
/// Whether a write should be propagated to the rest of the mesh.
///
/// Inbound replicated writes are applied with [`Broadcast::Suppress`]; this is
/// the only thing that stops a replicated write from being republished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Broadcast {
    /// Local write originating at this node: publish it.
    #[default]
    Publish,
    /// Write received from the bus: apply locally only.
    Suppress,
}

impl Broadcast {
    pub fn should_publish(self) -> bool {
        matches!(self, Broadcast::Publish)
    }
}

// == Replicable Store ==
/// A key-value store that can receive replicated writes.
pub trait ReplicableStore: Send + Sync {
    /// Name used to identify this store in logs.
    fn name(&self) -> &str;

    /// Returns the live value for `key`, refreshing its recency.
    fn get(&self, key: &str) -> Option<Value>;

    /// Writes `value` with a relative `ttl`.
    ///
    /// Failures are reported on the store's side channel before being
    /// returned; nothing is mutated or published when a write fails.
    fn set(&self, key: &str, value: &Value, ttl: Duration, broadcast: Broadcast) -> Result<()>;

    /// Deletes `key` locally. Never propagated.
    fn remove(&self, key: &str);

    /// Empties the store locally. Never propagated.
    fn clear(&self);
}

// == Broadcaster ==
/// Fan-out channel for replication events.
pub trait Broadcaster: Send + Sync {
    /// Registers a store to receive every future event. Not deduplicated.
    fn subscribe(&self, store: Arc<dyn ReplicableStore>);

    /// Delivers `event` to every subscriber, synchronously and in
    /// subscription order. Per-subscriber failures are contained.
    fn publish(&self, event: ReplicationEvent);
}
