//! Listener Module
//!
//! Observer hooks for cache events and the notifier that forwards to them.

use std::fmt::{self, Debug};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

// == Cache Event ==
/// The four observable cache decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEvent {
    /// A read found a live entry
    Hit,
    /// A read found nothing stored
    Miss,
    /// An entry was removed for being stale
    Expire,
    /// An entry was removed to make room
    Evict,
}

impl fmt::Display for CacheEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheEvent::Hit => "hit",
            CacheEvent::Miss => "miss",
            CacheEvent::Expire => "expire",
            CacheEvent::Evict => "evict",
        };
        f.write_str(name)
    }
}

// == Cache Listener ==
/// Observer for cache events.
///
/// Callbacks may run while the cache lock is held, so they must return
/// quickly and must not call back into the cache. A panicking callback is
/// caught and logged; it never reaches the caller.
///
/// All methods default to doing nothing, so implementors only override the
/// events they care about.
pub trait CacheListener<K>: Send + Sync {
    fn on_hit(&self, _key: &K) {}
    fn on_miss(&self, _key: &K) {}
    fn on_evict(&self, _key: &K) {}
    fn on_expire(&self, _key: &K) {}
}

impl<K, L> CacheListener<K> for Arc<L>
where
    L: CacheListener<K> + ?Sized,
{
    fn on_hit(&self, key: &K) {
        (**self).on_hit(key)
    }
    fn on_miss(&self, key: &K) {
        (**self).on_miss(key)
    }
    fn on_evict(&self, key: &K) {
        (**self).on_evict(key)
    }
    fn on_expire(&self, key: &K) {
        (**self).on_expire(key)
    }
}

// == Noop Listener ==
/// Listener used when none is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl<K> CacheListener<K> for NoopListener {}

// == Tracing Listener ==
/// Log-only listener: one debug event per cache decision.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl<K: Debug> CacheListener<K> for TracingListener {
    fn on_hit(&self, key: &K) {
        debug!(?key, "cache hit");
    }
    fn on_miss(&self, key: &K) {
        debug!(?key, "cache miss");
    }
    fn on_evict(&self, key: &K) {
        debug!(?key, "cache evict");
    }
    fn on_expire(&self, key: &K) {
        debug!(?key, "cache expire");
    }
}

// == Listener Fan-out ==
/// Forwards every event to each listener in turn.
pub struct Listeners<K> {
    inner: Vec<Arc<dyn CacheListener<K>>>,
}

impl<K> Listeners<K> {
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    /// Adds a listener to the end of the fan-out list.
    pub fn with(mut self, listener: impl CacheListener<K> + 'static) -> Self {
        self.inner.push(Arc::new(listener));
        self
    }
}

impl<K> Default for Listeners<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> CacheListener<K> for Listeners<K> {
    fn on_hit(&self, key: &K) {
        self.inner.iter().for_each(|l| l.on_hit(key));
    }
    fn on_miss(&self, key: &K) {
        self.inner.iter().for_each(|l| l.on_miss(key));
    }
    fn on_evict(&self, key: &K) {
        self.inner.iter().for_each(|l| l.on_evict(key));
    }
    fn on_expire(&self, key: &K) {
        self.inner.iter().for_each(|l| l.on_expire(key));
    }
}

// == Notifier ==
/// Forwards events to the configured listener, isolating its panics.
pub(crate) struct Notifier<K> {
    listener: Arc<dyn CacheListener<K>>,
}

impl<K> Notifier<K> {
    pub(crate) fn new(listener: Arc<dyn CacheListener<K>>) -> Self {
        Self { listener }
    }

    pub(crate) fn notify(&self, event: CacheEvent, key: &K) {
        let listener = &self.listener;
        let outcome = catch_unwind(AssertUnwindSafe(|| match event {
            CacheEvent::Hit => listener.on_hit(key),
            CacheEvent::Miss => listener.on_miss(key),
            CacheEvent::Expire => listener.on_expire(key),
            CacheEvent::Evict => listener.on_evict(key),
        }));
        if outcome.is_err() {
            warn!(%event, "cache listener panicked; event dropped");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(CacheEvent, String)>>,
    }

    impl CacheListener<String> for Recorder {
        fn on_hit(&self, key: &String) {
            self.events.lock().unwrap().push((CacheEvent::Hit, key.clone()));
        }
        fn on_miss(&self, key: &String) {
            self.events.lock().unwrap().push((CacheEvent::Miss, key.clone()));
        }
        fn on_evict(&self, key: &String) {
            self.events.lock().unwrap().push((CacheEvent::Evict, key.clone()));
        }
        fn on_expire(&self, key: &String) {
            self.events.lock().unwrap().push((CacheEvent::Expire, key.clone()));
        }
    }

    struct Panicker;

    impl CacheListener<String> for Panicker {
        fn on_hit(&self, _key: &String) {
            panic!("listener failure");
        }
    }

    #[test]
    fn test_notifier_routes_each_event() {
        let recorder = Arc::new(Recorder::default());
        let notifier: Notifier<String> = Notifier::new(recorder.clone());
        let key = "k".to_string();

        notifier.notify(CacheEvent::Hit, &key);
        notifier.notify(CacheEvent::Miss, &key);
        notifier.notify(CacheEvent::Expire, &key);
        notifier.notify(CacheEvent::Evict, &key);

        let events = recorder.events.lock().unwrap();
        let kinds: Vec<CacheEvent> = events.iter().map(|(e, _)| *e).collect();
        assert_eq!(
            kinds,
            vec![
                CacheEvent::Hit,
                CacheEvent::Miss,
                CacheEvent::Expire,
                CacheEvent::Evict
            ]
        );
    }

    #[test]
    fn test_notifier_swallows_listener_panic() {
        let notifier: Notifier<String> = Notifier::new(Arc::new(Panicker));
        notifier.notify(CacheEvent::Hit, &"k".to_string());
        notifier.notify(CacheEvent::Miss, &"k".to_string());
    }

    #[test]
    fn test_fanout_reaches_every_listener() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let listeners = Listeners::<String>::new().with(first.clone()).with(second.clone());

        listeners.on_evict(&"k".to_string());

        assert_eq!(first.events.lock().unwrap().len(), 1);
        assert_eq!(second.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_default_listeners_do_nothing() {
        let key = "k".to_string();
        CacheListener::<String>::on_hit(&NoopListener, &key);
        CacheListener::<String>::on_expire(&TracingListener, &key);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(CacheEvent::Expire.to_string(), "expire");
        assert_eq!(CacheEvent::Evict.to_string(), "evict");
    }
}
