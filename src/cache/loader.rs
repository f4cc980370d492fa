//! Backing Store Module
//!
//! The fallback source consulted when a read misses or finds a stale entry.

use async_trait::async_trait;

// == Backing Store ==
/// Source of values for keys the cache does not hold.
///
/// `None` means "not found"; loader failures are reported the same way.
/// The cache calls `load` without holding its lock and applies no timeout,
/// so a hanging loader hangs only the read that triggered it.
#[async_trait]
pub trait BackingStore<K, V>: Send + Sync {
    async fn load(&self, key: &K) -> Option<V>;
}

/// Plain synchronous closures work as backing stores.
#[async_trait]
impl<K, V, F> BackingStore<K, V> for F
where
    K: Sync + 'static,
    V: 'static,
    F: Fn(&K) -> Option<V> + Send + Sync,
{
    async fn load(&self, key: &K) -> Option<V> {
        self(key)
    }
}

// == No Backing Store ==
/// Backing store used when none is supplied: every key is not found.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBackingStore;

#[async_trait]
impl<K, V> BackingStore<K, V> for NoBackingStore
where
    K: Sync + 'static,
    V: 'static,
{
    async fn load(&self, _key: &K) -> Option<V> {
        None
    }
}
