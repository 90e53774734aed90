//! Coordination Bus
//!
//! In-process stand-in for an external broker: every published event is
//! applied synchronously, in subscription order, to each registered store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::{debug, info, warn};

use crate::bus::ReplicationEvent;
use crate::traits::{Broadcast, Broadcaster, ReplicableStore};

// == Coordination Bus ==
/// Fan-out registry of cache nodes.
///
/// The bus does not own its subscribers: it keeps weak references, so a node
/// that has been dropped simply stops receiving events.
#[derive(Default)]
pub struct CoordinationBus {
    subscribers: RwLock<Vec<Weak<dyn ReplicableStore>>>,
    published: AtomicU64,
}

impl CoordinationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registrations, including duplicates and dropped nodes.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of events published since creation.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    // Registry is copied so delivery runs without the lock held.
    fn snapshot(&self) -> Vec<Weak<dyn ReplicableStore>> {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Broadcaster for CoordinationBus {
    fn subscribe(&self, store: Arc<dyn ReplicableStore>) {
        info!(node = store.name(), "node subscribed to coordination bus");
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(&store));
    }

    fn publish(&self, event: ReplicationEvent) {
        self.published.fetch_add(1, Ordering::Relaxed);

        let value = match event.value() {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %event.key, error = %e, "dropping undecodable replication event");
                return;
            }
        };

        for subscriber in self.snapshot() {
            let Some(store) = subscriber.upgrade() else {
                debug!(key = %event.key, "skipping dropped subscriber");
                continue;
            };

            match store.set(&event.key, &value, event.ttl, Broadcast::Suppress) {
                Ok(()) => debug!(node = store.name(), key = %event.key, "replicated write applied"),
                Err(e) => warn!(
                    node = store.name(),
                    key = %event.key,
                    error = %e,
                    "subscriber failed to apply replicated write"
                ),
            }
        }
    }
}

impl std::fmt::Debug for CoordinationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinationBus")
            .field("subscribers", &self.subscriber_count())
            .field("published", &self.published_count())
            .finish()
    }
}
