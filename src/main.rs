//! ttl_lru demo
//!
//! Wires a small string cache in front of a toy backing store and walks
//! through put, eviction, refill and shutdown.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru::{CacheConfig, Listeners, StatsListener, TracingListener, TtlLruCache};

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build a capacity-2 cache backed by a lookup that knows `keyX`
/// 4. Exercise hit, eviction and refill
/// 5. Print the collected statistics and stop the sweeper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to debug for this crate, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig {
        capacity: 2,
        ..CacheConfig::from_env().context("loading cache configuration")?
    };
    info!(
        "Configuration loaded: capacity={}, default_ttl={:?}, cleanup_interval={:?}",
        config.capacity, config.default_ttl, config.cleanup_interval
    );

    let stats = Arc::new(StatsListener::new());
    let backing_store =
        |key: &String| (key == "keyX").then(|| "valueX".to_string());

    let cache = TtlLruCache::<String, String>::from_config(&config)
        .backing_store(backing_store)
        .listener(Listeners::new().with(TracingListener).with(stats.clone()))
        .build()
        .context("building cache")?;

    cache.put("key1".into(), "value1".into(), None).await;
    info!("key1 -> {:?}", cache.get_or_default(&"key1".into()).await);

    cache.put("key2".into(), "value2".into(), None).await;
    // Evicts key1, the least recently used
    cache.put("key3".into(), "value3".into(), None).await;
    info!("key1 -> {:?}", cache.get_or_default(&"key1".into()).await);

    // Not cached, served by the backing store and cached from then on
    info!("keyX -> {:?}", cache.get_or_default(&"keyX".into()).await);
    info!("keyX -> {:?}", cache.get_or_default(&"keyX".into()).await);

    let snapshot = stats.snapshot();
    info!(
        "Stats: {} (hit rate {:.2})",
        serde_json::to_string(&snapshot)?,
        snapshot.hit_rate()
    );

    cache.close();
    info!("Demo complete");
    Ok(())
}
