//! Cache Entry Module
//!
//! Defines the slot held for every cached key: the value plus the sliding
//! TTL bookkeeping.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value with its refresh timestamp and effective TTL.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key this entry is stored under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Last time the entry was written or read while live
    pub refreshed_at: Instant,
    /// Effective TTL (per-put override or the cache default)
    pub ttl: Duration,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry refreshed at `now`.
    pub fn new(key: K, value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            key,
            value,
            refreshed_at: now,
            ttl,
        }
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived its TTL as of `now`.
    ///
    /// Stale means strictly more than `ttl` has elapsed since the last
    /// refresh. A zero TTL is stale from the moment it is written.
    pub fn is_stale(&self, now: Instant) -> bool {
        self.ttl.is_zero() || now.saturating_duration_since(self.refreshed_at) > self.ttl
    }

    // == Refresh ==
    /// Restarts the sliding TTL window at `now`.
    pub fn refresh(&mut self, now: Instant) {
        self.refreshed_at = now;
    }

    // == Overwrite ==
    /// Replaces value and TTL, restarting the window.
    pub fn overwrite(&mut self, value: V, ttl: Duration, now: Instant) {
        self.value = value;
        self.ttl = ttl;
        self.refreshed_at = now;
    }

    // == Time To Live ==
    /// Returns how long the entry has left before it turns stale.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.refreshed_at))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", "v", Duration::from_secs(60), now);

        assert_eq!(entry.key, "k");
        assert_eq!(entry.value, "v");
        assert_eq!(entry.refreshed_at, now);
        assert!(!entry.is_stale(now));
    }

    #[test]
    fn test_entry_staleness_boundary() {
        let now = Instant::now();
        let ttl = Duration::from_millis(100);
        let entry = CacheEntry::new("k", 1, ttl, now);

        // Exactly at the TTL is still live; one tick past it is stale
        assert!(!entry.is_stale(now + ttl));
        assert!(entry.is_stale(now + ttl + Duration::from_nanos(1)));
    }

    #[test]
    fn test_zero_ttl_is_stale_immediately() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", 1, Duration::ZERO, now);
        assert!(entry.is_stale(now));
    }

    #[test]
    fn test_refresh_slides_window() {
        let start = Instant::now();
        let ttl = Duration::from_millis(100);
        let mut entry = CacheEntry::new("k", 1, ttl, start);

        let later = start + Duration::from_millis(80);
        entry.refresh(later);

        assert!(!entry.is_stale(start + Duration::from_millis(150)));
        assert!(entry.is_stale(later + ttl + Duration::from_millis(1)));
    }

    #[test]
    fn test_overwrite_replaces_value_and_ttl() {
        let start = Instant::now();
        let mut entry = CacheEntry::new("k", 1, Duration::from_secs(1), start);

        let later = start + Duration::from_millis(500);
        entry.overwrite(2, Duration::from_secs(10), later);

        assert_eq!(entry.value, 2);
        assert_eq!(entry.ttl, Duration::from_secs(10));
        assert_eq!(entry.refreshed_at, later);
    }

    #[test]
    fn test_ttl_remaining() {
        let start = Instant::now();
        let entry = CacheEntry::new("k", 1, Duration::from_secs(10), start);

        assert_eq!(entry.ttl_remaining(start), Duration::from_secs(10));
        assert_eq!(
            entry.ttl_remaining(start + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
        assert_eq!(
            entry.ttl_remaining(start + Duration::from_secs(30)),
            Duration::ZERO
        );
    }
}
