//! ttl_lru - A bounded in-process cache
//!
//! Combines LRU eviction with sliding per-entry TTL expiration, an optional
//! backing store consulted on miss or expiry, and a listener for hit, miss,
//! evict and expire events. A background task sweeps stale entries.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{
    BackingStore, CacheBuilder, CacheEvent, CacheListener, CacheStats, Listeners,
    NoBackingStore, NoopListener, StatsListener, TracingListener, TtlLruCache,
};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
