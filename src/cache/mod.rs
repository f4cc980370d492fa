//! Cache Module
//!
//! Provides a bounded in-memory cache with LRU eviction, sliding TTL
//! expiration, backing-store refill and event listeners.

mod entry;
pub mod expiry;
mod listener;
mod loader;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use expiry::Lookup;
pub use listener::{CacheEvent, CacheListener, Listeners, NoopListener, TracingListener};
pub use loader::{BackingStore, NoBackingStore};
pub use lru::{RecencyIndex, Upsert};
pub use stats::{CacheStats, StatsListener};
pub use store::{CacheBuilder, TtlLruCache};

pub(crate) use store::CacheCore;
