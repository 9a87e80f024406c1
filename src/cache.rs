// src/cache.rs

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use tracing::trace;

/// Bounded in-memory cache with insertion-order eviction.
///
/// Once `capacity` entries are stored, inserting a new key evicts the
/// *oldest inserted* key. Reads do not refresh an entry's position, so this
/// is FIFO rather than LRU. Overwriting an existing key keeps its slot.
///
/// The cache itself is not synchronised; owners wrap it in a `Mutex` so that
/// the capacity check and the eviction happen under one lock.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`, evicting the oldest entry if full.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }

        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            trace!(capacity = self.capacity, "evicted oldest cache entry");
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Key that would be evicted next.
    pub fn oldest(&self) -> Option<&K> {
        self.order.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
