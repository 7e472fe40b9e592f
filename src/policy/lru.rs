//! LRU (Least Recently Used) cache.
//!
//! Evicts the entry that has gone longest without access. Backed by a
//! [`RecencyList`] (a doubly linked list over a slot arena) for O(1)
//! reordering plus an `FxHashMap` index for O(1) key lookup.
//!
//! ```text
//!                  ┌────────────────────────────┐
//!   index          │        RecencyList         │
//!   FxHashMap      │  MRU ◄──► ... ◄──► LRU     │
//!   K ─► SlotId ───┼──► Entry { key, value }    │
//!                  └────────────────────────────┘
//! ```
//!
//! Every entry lives in exactly one list node; the index maps each resident
//! key to that node's `SlotId`. A hit moves the node to the front, an insert
//! over capacity pops the back. Both structures are plain safe Rust; node
//! identity is a `SlotId` handle, never a pointer.
//!
//! # Operation costs
//!
//! | Operation      | Cost | Recency effect        |
//! |----------------|------|-----------------------|
//! | `insert`       | O(1) | new/updated entry MRU |
//! | `get`          | O(1) | hit becomes MRU       |
//! | `peek`         | O(1) | none                  |
//! | `touch`        | O(1) | hit becomes MRU       |
//! | `remove`       | O(1) | none                  |
//! | `pop_lru`      | O(1) | removes LRU           |
//! | `peek_lru`     | O(1) | none                  |
//! | `recency_rank` | O(n) | none                  |
//!
//! # Single-threaded core
//!
//! [`LruCache`] is not `Sync`-shareable for mutation; every read is a write
//! to the recency order. Wrap it in [`ConcurrentLruCache`] (feature
//! `concurrency`) for multi-threaded use.
//!
//! # Example
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//! use lrukit::traits::{CoreCache, LruCacheTrait};
//!
//! let mut cache = LruCache::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! assert_eq!(cache.get(&"a"), Some(&1));
//!
//! // "b" is now the LRU entry, so inserting "c" evicts it.
//! cache.insert("c", 3);
//! assert!(!cache.contains(&"b"));
//! assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some("a"));
//! ```

use std::fmt;
use std::hash::Hash;
use std::mem;

use rustc_hash::FxHashMap;

use crate::ds::{RecencyList, SlotId};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

/// One resident key-value pair.
///
/// The key is stored here as well as in the index so that eviction can
/// remove the index entry without a reverse map.
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Bounded LRU cache with O(1) insert, get, and eviction.
///
/// Keys must be `Eq + Hash + Clone`; the clone covers the second copy of the
/// key kept in the list node. Capacity is fixed at construction. A capacity
/// of zero is legal and makes every `insert` a no-op.
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    order: RecencyList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache that holds at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: RecencyList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Returns a reference to a value without updating recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();
        let id = *self.index.get(key)?;
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_hit();
        self.order.get(id).map(|entry| &entry.value)
    }

    /// Moves the entry to the MRU position, optionally replacing its value.
    ///
    /// This is the single reorder point shared by `get`, `touch`, and the
    /// update path of `insert`. Returns the displaced value when `value` is
    /// `Some`. `id` must come from the index and therefore be live.
    fn promote(&mut self, id: SlotId, value: Option<V>) -> Option<V> {
        let previous = match value {
            Some(new_value) => self
                .order
                .get_mut(id)
                .map(|entry| mem::replace(&mut entry.value, new_value)),
            None => None,
        };
        let moved = self.order.move_to_front(id);
        debug_assert!(moved, "promote called with a dead SlotId");
        previous
    }

    /// Removes the LRU entry from both structures.
    fn evict_lru(&mut self) -> Option<(K, V)> {
        let entry = self.order.pop_back()?;
        let removed = self.index.remove(&entry.key);
        debug_assert!(removed.is_some(), "evicted key was not in the index");
        Some((entry.key, entry.value))
    }

    /// Verifies the index/list invariants, returning a description of the
    /// first violation found.
    ///
    /// Checked: the index and list agree on membership and size, every index
    /// entry points at the node holding its key, the list is acyclic, and
    /// `len <= capacity`. O(n); intended for tests and debug assertions.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "index has {} entries but recency list has {}",
                self.index.len(),
                self.order.len()
            )));
        }
        if self.order.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.order.len(),
                self.capacity
            )));
        }
        let mut visited = 0usize;
        for (id, entry) in self.order.iter_entries() {
            visited += 1;
            if visited > self.index.len() {
                return Err(InvariantError::new("cycle detected in recency list"));
            }
            match self.index.get(&entry.key) {
                Some(&mapped) if mapped == id => {},
                Some(_) => {
                    return Err(InvariantError::new(
                        "index maps a key to a different node than the one holding it",
                    ));
                },
                None => {
                    return Err(InvariantError::new(
                        "recency list holds a key absent from the index",
                    ));
                },
            }
        }
        if visited != self.index.len() {
            return Err(InvariantError::new(
                "recency list traversal did not reach every entry",
            ));
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    fn validate(&self) {
        self.order.debug_validate();
        if let Err(err) = self.check_invariants() {
            panic!("cache invariant violated: {err}");
        }
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn validate(&self) {}

    /// Returns a point-in-time copy of the operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            pop_lru_calls: self.metrics.pop_lru_calls,
            pop_lru_found: self.metrics.pop_lru_found,
            peek_calls: self.metrics.peek_calls.get(),
            peek_hits: self.metrics.peek_hits.get(),
            peek_lru_calls: self.metrics.peek_lru_calls.get(),
            peek_lru_found: self.metrics.peek_lru_found.get(),
            touch_calls: self.metrics.touch_calls,
            touch_found: self.metrics.touch_found,
            recency_rank_calls: self.metrics.recency_rank_calls.get(),
            recency_rank_found: self.metrics.recency_rank_found.get(),
            recency_rank_scan_steps: self.metrics.recency_rank_scan_steps.get(),
            cache_len: self.len(),
            capacity: self.capacity,
        }
    }

    /// Iterates over `(&K, &V)` pairs from MRU to LRU without updating
    /// recency.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(|entry| (&entry.key, &entry.value))
    }
}

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            let previous = self.promote(id, Some(value));
            self.validate();
            return previous;
        }

        if self.capacity == 0 {
            return None;
        }

        if self.index.len() >= self.capacity {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();
            let evicted = self.evict_lru();
            debug_assert!(evicted.is_some(), "full cache had nothing to evict");
            #[cfg(feature = "metrics")]
            if evicted.is_some() {
                self.metrics.record_evicted_entry();
            }
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
        let id = self.order.push_front(Entry {
            key: key.clone(),
            value,
        });
        let displaced = self.index.insert(key, id);
        debug_assert!(displaced.is_none(), "new key was already indexed");
        self.validate();
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            },
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();
        self.promote(id, None);
        self.validate();
        self.order.get(id).map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        self.index.clear();
        self.order.clear();
        self.validate();
    }
}

impl<K, V> MutableCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        let entry = self.order.remove(id);
        debug_assert!(entry.is_some(), "indexed key had no list node");
        self.validate();
        entry.map(|entry| entry.value)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();
        let popped = self.evict_lru()?;
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_found();
        self.validate();
        Some(popped)
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_lru_call();
        let entry = self.order.back()?;
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_lru_found();
        Some((&entry.key, &entry.value))
    }

    fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => return false,
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_found();
        self.promote(id, None);
        self.validate();
        true
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_recency_rank_call();
        let target = *self.index.get(key)?;
        for (rank, id) in self.order.iter_ids().enumerate() {
            #[cfg(feature = "metrics")]
            (&self.metrics).record_recency_rank_scan_step();
            if id == target {
                #[cfg(feature = "metrics")]
                (&self.metrics).record_recency_rank_found();
                return Some(rank);
            }
        }
        // Unreachable while invariants hold: an indexed key is in the list.
        None
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("mru", &self.order.front().map(|entry| &entry.key))
            .field("lru", &self.order.back().map(|entry| &entry.key))
            .finish()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Thread-safe LRU cache.
///
/// Wraps [`LruCache`] in a [`parking_lot::RwLock`] and stores values as
/// `Arc<V>` so they can be returned across the lock boundary without
/// cloning `V`. Recency-mutating reads (`get`, `touch`) take the write
/// lock; `peek`, `peek_lru`, `contains`, and size queries take the read
/// lock. Cloning the handle is cheap and shares the underlying cache.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::ConcurrentLruCache;
///
/// let cache = ConcurrentLruCache::new(100);
/// cache.insert(1, "one".to_string());
///
/// let worker = cache.clone();
/// std::thread::spawn(move || {
///     assert_eq!(worker.get(&1).as_deref(), Some(&"one".to_string()));
/// })
/// .join()
/// .unwrap();
/// ```
#[cfg(feature = "concurrency")]
pub struct ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<RwLock<LruCache<K, Arc<V>>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> Clone for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a shared cache that holds at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Inserts a value, returning the previous one if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.insert_arc(key, Arc::new(value))
    }

    /// Inserts an already-shared value.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.write().insert(key, value)
    }

    /// Gets a value, marking it most recently used.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.write().get(key).map(Arc::clone)
    }

    /// Gets a value without updating recency.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.read().peek(key).map(Arc::clone)
    }

    /// Removes a key, returning its value if present.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.write().remove(key)
    }

    /// Marks a key most recently used; returns `true` if it was found.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.write().touch(key)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, Arc<V>)> {
        self.inner.write().pop_lru()
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(K, Arc<V>)> {
        let guard = self.inner.read();
        guard.peek_lru().map(|(k, v)| (k.clone(), Arc::clone(v)))
    }

    /// Returns `true` if the key is resident.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Verifies the inner cache's invariants under the read lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }

    /// Returns a point-in-time copy of the operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> crate::traits::ConcurrentCache for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.read().fmt(f)
    }
}
