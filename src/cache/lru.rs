//! Recency List Module
//!
//! Arena-backed doubly-linked list ordering entries from most to least
//! recently used.
//!
//! Slots are addressed by stable `usize` indices. Slot 0 is a sentinel that
//! closes the ring: `slots[0].next` is the head (most recent) and
//! `slots[0].prev` is the tail (eviction candidate). Reclaimed slots go on a
//! free list and are reused before the arena grows.

use super::CacheEntry;

const SENTINEL: usize = 0;

struct Slot<K, V> {
    entry: Option<CacheEntry<K, V>>,
    prev: usize,
    next: usize,
}

impl<K, V> Slot<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: SENTINEL,
            next: SENTINEL,
        }
    }
}

// == Recency List ==
/// Owns every entry in the cache and tracks their access order.
pub struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(1));
        slots.push(Slot::sentinel());
        Self {
            slots,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Stores `entry` as the most recently used and returns its slot index.
    pub fn push_front(&mut self, entry: CacheEntry<K, V>) -> usize {
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx].entry = Some(entry);
                idx
            }
            None => {
                self.slots.push(Slot {
                    entry: Some(entry),
                    prev: SENTINEL,
                    next: SENTINEL,
                });
                self.slots.len() - 1
            }
        };

        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Marks the entry at `idx` as most recently used.
    pub fn move_to_front(&mut self, idx: usize) {
        if !self.is_occupied(idx) || self.slots[SENTINEL].next == idx {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Unlinks the entry at `idx` and returns it, freeing the slot.
    pub fn remove(&mut self, idx: usize) -> Option<CacheEntry<K, V>> {
        if !self.is_occupied(idx) {
            return None;
        }

        self.unlink(idx);
        let entry = self.slots[idx].entry.take();
        self.slots[idx].prev = SENTINEL;
        self.slots[idx].next = SENTINEL;
        self.free.push(idx);
        self.len -= 1;
        entry
    }

    // == Back ==
    /// Returns the slot index of the least recently used entry.
    pub fn back(&self) -> Option<usize> {
        match self.slots[SENTINEL].prev {
            SENTINEL => None,
            idx => Some(idx),
        }
    }

    pub fn get(&self, idx: usize) -> Option<&CacheEntry<K, V>> {
        self.slots.get(idx).and_then(|slot| slot.entry.as_ref())
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut CacheEntry<K, V>> {
        self.slots.get_mut(idx).and_then(|slot| slot.entry.as_mut())
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.slots[SENTINEL].next,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every entry and releases all slots.
    pub fn clear(&mut self) {
        self.slots.truncate(1);
        self.slots[SENTINEL] = Slot::sentinel();
        self.free.clear();
        self.len = 0;
    }

    fn is_occupied(&self, idx: usize) -> bool {
        idx != SENTINEL && self.get(idx).is_some()
    }

    fn link_front(&mut self, idx: usize) {
        let head = self.slots[SENTINEL].next;
        self.slots[idx].prev = SENTINEL;
        self.slots[idx].next = head;
        self.slots[head].prev = idx;
        self.slots[SENTINEL].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }
}

// == Iterator ==
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a CacheEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == SENTINEL {
            return None;
        }
        let slot = &self.list.slots[self.cursor];
        self.cursor = slot.next;
        slot.entry.as_ref()
    }
}
