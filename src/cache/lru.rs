//! LRU Recency Index Module
//!
//! Bounded key → entry store that keeps a strict recency order.
//!
//! Entries live in an arena of slots linked by index into a doubly-linked
//! list; a HashMap resolves keys to slots. Touch, insert-at-front and
//! evict-from-back are all O(1). Freed slots are recycled through a free
//! list so the arena never grows past `capacity`.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

/// Null link.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Slot<K, V> {
    entry: Option<CacheEntry<K, V>>,
    prev: usize,
    next: usize,
}

// == Upsert Outcome ==
/// Result of [`RecencyIndex::touch_or_insert`].
#[derive(Debug)]
pub enum Upsert<K, V> {
    /// The key was present; value, TTL and timestamp were overwritten.
    Updated,
    /// The key was new. If the index was full, the least recently used
    /// entry was evicted to make room and is handed back here.
    Inserted { evicted: Option<CacheEntry<K, V>> },
}

// == Recency Index ==
/// Tracks entries in recency order for LRU eviction.
///
/// - Head = most recently used
/// - Tail = least recently used
#[derive(Debug)]
pub struct RecencyIndex<K, V> {
    /// Key to slot position
    map: HashMap<K, usize>,
    /// Slot arena
    slots: Vec<Slot<K, V>>,
    /// Vacant slot positions ready for reuse
    free: Vec<usize>,
    head: usize,
    tail: usize,
    capacity: usize,
}

impl<K, V> RecencyIndex<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates an empty index holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        Ok(Self {
            map: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            capacity,
        })
    }

    // == Touch Or Insert ==
    /// Writes `value` under `key` and moves it to the most-recently-used
    /// position.
    ///
    /// Existing keys are overwritten in place. New keys evict the least
    /// recently used entry first when the index is full.
    pub fn touch_or_insert(
        &mut self,
        key: K,
        value: V,
        ttl: Duration,
        now: Instant,
    ) -> Upsert<K, V> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(entry) = self.slots[idx].entry.as_mut() {
                entry.overwrite(value, ttl, now);
            }
            self.move_to_front(idx);
            return Upsert::Updated;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        let idx = self.alloc(CacheEntry::new(key.clone(), value, ttl, now));
        self.push_front(idx);
        self.map.insert(key, idx);

        Upsert::Inserted { evicted }
    }

    // == Lookup ==
    /// Returns the entry for `key` without changing its position.
    pub fn lookup(&self, key: &K) -> Option<&CacheEntry<K, V>> {
        let idx = *self.map.get(key)?;
        self.slots[idx].entry.as_ref()
    }

    /// Mutable variant of [`lookup`](Self::lookup); position is unchanged.
    pub fn lookup_mut(&mut self, key: &K) -> Option<&mut CacheEntry<K, V>> {
        let idx = *self.map.get(key)?;
        self.slots[idx].entry.as_mut()
    }

    // == Touch ==
    /// Marks `key` as most recently used. Returns false if it is absent.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.map.get(key) {
            Some(&idx) => {
                self.move_to_front(idx);
                true
            }
            None => false,
        }
    }

    // == Remove ==
    /// Removes `key`, returning whether anything was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.take(key).is_some()
    }

    /// Removes `key` and hands back its entry.
    pub fn take(&mut self, key: &K) -> Option<CacheEntry<K, V>> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        self.release(idx)
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the index is empty.
    pub fn evict_oldest(&mut self) -> Option<CacheEntry<K, V>> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        self.unlink(idx);
        let entry = self.release(idx)?;
        self.map.remove(&entry.key);
        Some(entry)
    }

    // == Peek Oldest ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_oldest(&self) -> Option<&CacheEntry<K, V>> {
        if self.tail == NIL {
            return None;
        }
        self.slots[self.tail].entry.as_ref()
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            cursor: self.head,
        }
    }

    // == Clear ==
    /// Drops every entry and resets the arena.
    pub fn clear(&mut self) {
        self.map.clear();
        self.slots.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    // == Length ==
    /// Returns the number of held entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Arena Plumbing ==
    fn alloc(&mut self, entry: CacheEntry<K, V>) -> usize {
        let slot = Slot {
            entry: Some(entry),
            prev: NIL,
            next: NIL,
        };
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Option<CacheEntry<K, V>> {
        let entry = self.slots[idx].entry.take();
        self.free.push(idx);
        entry
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);

        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next].prev = prev;
        }

        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }

    fn push_front(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }
}

// == Iterator ==
/// Iterator over entries in recency order, see [`RecencyIndex::iter`].
pub struct Iter<'a, K, V> {
    slots: &'a [Slot<K, V>],
    cursor: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a CacheEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let slot = &self.slots[self.cursor];
        self.cursor = slot.next;
        slot.entry.as_ref()
    }
}
