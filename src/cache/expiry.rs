//! Expiry Module
//!
//! Sliding-TTL logic over the recency index: the lazy check done on every
//! read and the eager sweep driven by the cleanup task.

use std::hash::Hash;
use std::time::Instant;

use crate::cache::RecencyIndex;

// == Read Outcome ==
/// What a read found for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// Live entry; its recency and refresh timestamp were bumped.
    Hit(V),
    /// Entry was stale and has been removed.
    Expired,
    /// Nothing stored under the key.
    Miss,
}

// == Lazy Path ==
/// Reads `key` with sliding-expiry semantics.
///
/// A live entry is moved to the most-recently-used position and its TTL
/// window restarted at `now`. A stale entry is removed on the spot.
pub fn read<K, V>(index: &mut RecencyIndex<K, V>, key: &K, now: Instant) -> Lookup<V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    let value = match index.lookup_mut(key) {
        None => return Lookup::Miss,
        Some(entry) if entry.is_stale(now) => None,
        Some(entry) => {
            entry.refresh(now);
            Some(entry.value.clone())
        }
    };

    match value {
        Some(value) => {
            index.touch(key);
            Lookup::Hit(value)
        }
        None => {
            index.remove(key);
            Lookup::Expired
        }
    }
}

/// Returns the value for `key` if it is live, without any side effects.
pub fn peek<'a, K, V>(index: &'a RecencyIndex<K, V>, key: &K, now: Instant) -> Option<&'a V>
where
    K: Eq + Hash + Clone,
{
    index
        .lookup(key)
        .filter(|entry| !entry.is_stale(now))
        .map(|entry| &entry.value)
}

// == Eager Path ==
/// Removes every stale entry, returning the removed keys in recency order.
///
/// Full scan, O(n) in the number of held entries.
pub fn sweep<K, V>(index: &mut RecencyIndex<K, V>, now: Instant) -> Vec<K>
where
    K: Eq + Hash + Clone,
{
    let stale: Vec<K> = index
        .iter()
        .filter(|entry| entry.is_stale(now))
        .map(|entry| entry.key.clone())
        .collect();

    for key in &stale {
        index.remove(key);
    }

    stale
}
