//! Expiry Sweeper Task
//!
//! Periodically purges expired entries from a set of cache nodes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheNode;
use crate::traits::ReplicableStore;

/// Spawns a task that purges expired entries from every node in `nodes`
/// once per `interval`.
///
/// Sweeping only removes entries a read would already treat as absent; it
/// does not touch recency of live entries. Abort the returned handle to stop.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweeper(vec![montreal.clone(), paris.clone()], Duration::from_secs(1));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweeper(nodes: Vec<Arc<CacheNode>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            nodes = nodes.len(),
            interval_ms = interval_millis(interval),
            "starting expiry sweeper"
        );

        // tokio rejects a zero period.
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        // First tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            for node in &nodes {
                let removed = node.purge_expired();
                if removed > 0 {
                    info!(node = node.name(), removed, "expiry sweep removed entries");
                } else {
                    debug!(node = node.name(), "expiry sweep found nothing");
                }
            }
        }
    })
}

/// Interval in whole milliseconds for log fields, saturating at `u64::MAX`.
fn interval_millis(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::CoordinationBus;
    use crate::traits::Broadcast;
    use serde_json::json;

    fn node() -> Arc<CacheNode> {
        Arc::new(CacheNode::new("sweep", 10, Arc::new(CoordinationBus::new())))
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let node = node();
        node.set("short", &json!(1), Duration::from_millis(50), Broadcast::Publish)
            .unwrap();
        node.set("long", &json!(2), Duration::from_secs(3600), Broadcast::Publish)
            .unwrap();

        let handle = spawn_sweeper(vec![node.clone()], Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(350)).await;
        handle.abort();

        assert!(!node.contains("short"), "expired entry should have been swept");
        assert!(node.contains("long"));
        assert_eq!(node.stats().expirations, 1);
    }

    #[test]
    fn test_interval_millis_saturates() {
        assert_eq!(interval_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(interval_millis(Duration::from_secs(u64::MAX)), u64::MAX);
        assert_eq!(interval_millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn test_sweeper_can_be_aborted() {
        let handle = spawn_sweeper(vec![node()], Duration::from_millis(100));

        handle.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(handle.is_finished(), "task should be finished after abort");
    }
}
