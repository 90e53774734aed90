//! Geo Cache - replicated in-memory cache nodes
//!
//! Demo driver: builds one cache node per configured region on a shared
//! coordination bus, writes in the first region and reads the value back
//! from every region.

use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geo_cache::{
    spawn_sweeper, Broadcast, Broadcaster, CacheNode, Config, CoordinationBus, ReplicableStore,
};

/// Entry point for the replication demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the bus and one subscribed node per region
/// 4. Start the expiry sweeper if configured
/// 5. Write in the first region, read from all regions
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geo_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    config.validate().context("refusing to start")?;
    info!(
        "Configuration loaded: max_entries={}, default_ttl={}s, sweep_interval={}s, regions={:?}",
        config.max_entries, config.default_ttl, config.sweep_interval, config.regions
    );

    let bus = Arc::new(CoordinationBus::new());
    let nodes: Vec<Arc<CacheNode>> = config
        .regions
        .iter()
        .map(|region| {
            let node = Arc::new(CacheNode::new(region.as_str(), config.max_entries, bus.clone()));
            bus.subscribe(node.clone());
            node
        })
        .collect();

    let sweeper = config
        .sweep_interval()
        .map(|interval| spawn_sweeper(nodes.clone(), interval));

    for node in &nodes {
        info!(node = node.name(), value = ?node.get("test"), "initial value");
    }

    let origin = nodes.first().context("no regions configured")?;
    info!(node = origin.name(), "setting value, letting it propagate");
    origin.set(
        "test",
        &json!([{ "string": "cached value" }]),
        config.ttl(),
        Broadcast::Publish,
    )?;

    // Delivery is synchronous: every region already sees the write.
    for node in &nodes {
        let value = node.get("test");
        info!(
            node = node.name(),
            value = %serde_json::to_string(&value)?,
            "value after propagation"
        );
    }

    for node in &nodes {
        info!(node = node.name(), stats = %serde_json::to_string(&node.stats())?, "node stats");
    }

    if let Some(handle) = sweeper {
        handle.abort();
    }
    info!(published = bus.published_count(), "demo complete");
    Ok(())
}
