//! Cache Statistics Module
//!
//! Counts hits, misses, evictions and expirations by listening to cache
//! events.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::cache::CacheListener;

// == Cache Stats ==
/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing stored
    pub misses: u64,
    /// Entries removed due to LRU policy
    pub evictions: u64,
    /// Entries removed for being stale
    pub expirations: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Listener ==
/// Listener that tallies every event it sees.
#[derive(Debug, Default)]
pub struct StatsListener {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl StatsListener {
    pub fn new() -> Self {
        Self::default()
    }

    // == Snapshot ==
    /// Returns the current counter values.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}

impl<K> CacheListener<K> for StatsListener {
    fn on_hit(&self, _key: &K) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }
    fn on_miss(&self, _key: &K) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
    fn on_evict(&self, _key: &K) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }
    fn on_expire(&self, _key: &K) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn record(stats: &StatsListener, hits: usize, misses: usize) {
        for _ in 0..hits {
            CacheListener::<u32>::on_hit(stats, &0);
        }
        for _ in 0..misses {
            CacheListener::<u32>::on_miss(stats, &0);
        }
    }

    #[test]
    fn test_stats_new() {
        let stats = StatsListener::new().snapshot();
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let stats = StatsListener::new();
        record(&stats, 3, 0);
        assert_eq!(stats.snapshot().hit_rate(), 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = StatsListener::new();
        record(&stats, 1, 1);
        assert_eq!(stats.snapshot().hit_rate(), 0.5);
    }

    #[test]
    fn test_eviction_and_expiration_counters() {
        let stats = StatsListener::new();
        CacheListener::<u32>::on_evict(&stats, &1);
        CacheListener::<u32>::on_evict(&stats, &2);
        CacheListener::<u32>::on_expire(&stats, &3);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.evictions, 2);
        assert_eq!(snapshot.expirations, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let stats = CacheStats {
            hits: 2,
            misses: 1,
            evictions: 0,
            expirations: 4,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 2);
        assert_eq!(json["expirations"], 4);
    }
}
