//! Cache Store Module
//!
//! The public cache: recency index, sliding TTL expiry, backing-store
//! refill and listener notifications behind a single lock, with a
//! background sweeper attached.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

use crate::cache::expiry::{self, Lookup};
use crate::cache::listener::Notifier;
use crate::cache::lru::Upsert;
use crate::cache::{
    BackingStore, CacheEvent, CacheListener, NoBackingStore, NoopListener, RecencyIndex,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_cleanup_task, CleanupHandle};

// == Cache Core ==
/// Lock-protected state shared between the cache handle and its sweeper.
pub(crate) struct CacheCore<K, V> {
    /// Recency index, the only mutable shared state
    index: RwLock<RecencyIndex<K, V>>,
    notifier: Notifier<K>,
    loader: Arc<dyn BackingStore<K, V>>,
    default_ttl: Duration,
}

impl<K, V> CacheCore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn insert(&self, key: K, value: V, ttl: Duration) {
        let mut index = self.index.write().await;
        let now = Instant::now();
        let outcome = index.touch_or_insert(key, value, ttl, now);
        if let Upsert::Inserted { evicted: Some(entry) } = outcome {
            trace!("evicted least recently used entry");
            self.notifier.notify(CacheEvent::Evict, &entry.key);
        }
    }

    async fn get(&self, key: &K) -> Option<V> {
        let lookup = {
            let mut index = self.index.write().await;
            let lookup = expiry::read(&mut index, key, Instant::now());
            match &lookup {
                Lookup::Hit(_) => self.notifier.notify(CacheEvent::Hit, key),
                Lookup::Expired => self.notifier.notify(CacheEvent::Expire, key),
                Lookup::Miss => self.notifier.notify(CacheEvent::Miss, key),
            }
            lookup
        };

        match lookup {
            Lookup::Hit(value) => Some(value),
            Lookup::Expired | Lookup::Miss => self.refill(key).await,
        }
    }

    /// Consults the backing store outside the lock and caches what it finds.
    ///
    /// Concurrent refills of one key are not coalesced: each caller loads
    /// and inserts, and the last insert wins.
    async fn refill(&self, key: &K) -> Option<V> {
        let value = self.loader.load(key).await?;
        debug!("backing store refill");
        self.insert(key.clone(), value.clone(), self.default_ttl).await;
        Some(value)
    }

    async fn remove(&self, key: &K) -> bool {
        self.index.write().await.remove(key)
    }

    /// Removes every stale entry, notifying an expiry for each.
    pub(crate) async fn sweep_expired(&self) -> usize {
        let mut index = self.index.write().await;
        let removed = expiry::sweep(&mut index, Instant::now());
        for key in &removed {
            self.notifier.notify(CacheEvent::Expire, key);
        }
        removed.len()
    }
}

// == TTL LRU Cache ==
/// Bounded cache with LRU eviction and sliding per-entry TTL.
///
/// Reads that miss, or that find a stale entry, fall through to the
/// configured [`BackingStore`]. A background task sweeps stale entries every
/// cleanup interval until [`close`](Self::close) is called or the cache is
/// dropped.
///
/// Share it between tasks with an `Arc`; every method takes `&self`.
///
/// # Example
/// ```no_run
/// # async fn demo() -> ttl_lru::Result<()> {
/// use std::time::Duration;
/// use ttl_lru::TtlLruCache;
///
/// let cache = TtlLruCache::<String, String>::builder(2)
///     .default_ttl(Duration::from_secs(5))
///     .build()?;
///
/// cache.put("key1".to_string(), "value1".to_string(), None).await;
/// assert_eq!(cache.get(&"key1".to_string()).await, Some("value1".to_string()));
/// cache.close();
/// # Ok(())
/// # }
/// ```
pub struct TtlLruCache<K, V> {
    pub(crate) core: Arc<CacheCore<K, V>>,
    pub(crate) cleanup: CleanupHandle,
    capacity: usize,
    cleanup_interval: Duration,
}

impl<K, V> TtlLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Starts building a cache holding at most `capacity` entries.
    pub fn builder(capacity: usize) -> CacheBuilder<K, V> {
        CacheBuilder::new(CacheConfig {
            capacity,
            ..CacheConfig::default()
        })
    }

    /// Starts building a cache from a loaded configuration.
    pub fn from_config(config: &CacheConfig) -> CacheBuilder<K, V> {
        CacheBuilder::new(config.clone())
    }

    // == Put ==
    /// Stores `value` under `key`, overwriting any previous entry.
    ///
    /// `ttl` overrides the default TTL for this entry. A zero override
    /// stores an entry that is already expired.
    pub async fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.core.default_ttl);
        self.core.insert(key, value, ttl).await;
    }

    // == Get ==
    /// Returns the live value for `key`, refilling from the backing store
    /// on a miss or after expiry.
    ///
    /// A hit moves the key to the most-recently-used position and restarts
    /// its TTL window.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.core.get(key).await
    }

    /// Like [`get`](Self::get) but yields `V::default()` for absent keys.
    pub async fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.get(key).await.unwrap_or_default()
    }

    // == Remove ==
    /// Deletes `key`. Returns whether anything was removed.
    pub async fn remove(&self, key: &K) -> bool {
        self.core.remove(key).await
    }

    // == Close ==
    /// Stops the background sweep.
    ///
    /// Safe to call any number of times from any thread; only the first
    /// call has an effect. The cache itself stays usable.
    pub fn close(&self) {
        self.cleanup.stop();
    }

    /// Returns true once the background sweep has been asked to stop.
    pub fn is_closed(&self) -> bool {
        self.cleanup.is_stopped()
    }

    // == Inspection ==
    /// Returns true if `key` holds a live entry. No recency bump, no events.
    pub async fn contains(&self, key: &K) -> bool {
        let index = self.core.index.read().await;
        expiry::peek(&index, key, Instant::now()).is_some()
    }

    /// Returns the live value for `key` without bumping recency or TTL, and
    /// without consulting the backing store.
    pub async fn peek(&self, key: &K) -> Option<V> {
        let index = self.core.index.read().await;
        expiry::peek(&index, key, Instant::now()).cloned()
    }

    /// Time left before the entry under `key` turns stale, or `None` when
    /// the key is absent or already stale. Has no side effects.
    pub async fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        let now = Instant::now();
        let index = self.core.index.read().await;
        index
            .lookup(key)
            .filter(|entry| !entry.is_stale(now))
            .map(|entry| entry.ttl_remaining(now))
    }

    /// Keys from most to least recently used, stale ones included.
    pub async fn keys(&self) -> Vec<K> {
        let index = self.core.index.read().await;
        index.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Number of held entries, including stale ones not yet swept.
    pub async fn len(&self) -> usize {
        self.core.index.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.core.index.read().await.is_empty()
    }

    // == Maintenance ==
    /// Drops every entry without firing events.
    pub async fn clear(&self) {
        self.core.index.write().await.clear();
    }

    /// Runs one eager sweep now, returning the number of entries removed.
    pub async fn sweep_expired(&self) -> usize {
        self.core.sweep_expired().await
    }

    // == Configuration ==
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.core.default_ttl
    }

    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }
}

impl<K, V> Drop for TtlLruCache<K, V> {
    fn drop(&mut self) {
        self.cleanup.stop();
    }
}

impl<K, V> fmt::Debug for TtlLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlLruCache")
            .field("capacity", &self.capacity)
            .field("default_ttl", &self.core.default_ttl)
            .field("cleanup_interval", &self.cleanup_interval)
            .field("closed", &self.cleanup.is_stopped())
            .field("sweeper_running", &!self.cleanup.is_finished())
            .finish()
    }
}

// == Cache Builder ==
/// Collects construction-time settings for a [`TtlLruCache`].
pub struct CacheBuilder<K, V> {
    config: CacheConfig,
    loader: Arc<dyn BackingStore<K, V>>,
    listener: Arc<dyn CacheListener<K>>,
}

impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn new(config: CacheConfig) -> Self {
        Self {
            config,
            loader: Arc::new(NoBackingStore),
            listener: Arc::new(NoopListener),
        }
    }

    /// TTL for entries written without an override, and for every refill.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = ttl;
        self
    }

    /// Pause between background sweeps.
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.config.cleanup_interval = interval;
        self
    }

    /// Fallback source for misses and expired entries.
    pub fn backing_store(mut self, loader: impl BackingStore<K, V> + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Observer for hit, miss, evict and expire events.
    pub fn listener(mut self, listener: impl CacheListener<K> + 'static) -> Self {
        self.listener = Arc::new(listener);
        self
    }

    // == Build ==
    /// Validates the settings and starts the background sweeper.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<TtlLruCache<K, V>> {
        let config = self.config;
        config.validate()?;
        Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let core = Arc::new(CacheCore {
            index: RwLock::new(RecencyIndex::new(config.capacity)?),
            notifier: Notifier::new(self.listener),
            loader: self.loader,
            default_ttl: config.default_ttl,
        });
        let cleanup = spawn_cleanup_task(Arc::downgrade(&core), config.cleanup_interval);

        info!(
            capacity = config.capacity,
            default_ttl_ms = config.default_ttl.as_millis() as u64,
            cleanup_interval_ms = config.cleanup_interval.as_millis() as u64,
            "cache initialized"
        );

        Ok(TtlLruCache {
            core,
            cleanup,
            capacity: config.capacity,
            cleanup_interval: config.cleanup_interval,
        })
    }
}
