//! Cache trait hierarchy.
//!
//! Three layers, each adding operations the layer below cannot express:
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │  insert / get / contains / len /        │
//!   │  is_empty / capacity / clear            │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │           MutableCache<K, V>            │
//!   │  remove / remove_batch                  │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          LruCacheTrait<K, V>            │
//!   │  pop_lru / peek_lru / touch /           │
//!   │  recency_rank                           │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! `CoreCache::get` is deliberately `&mut self`: for a recency-ordered cache
//! a read is a write to the eviction order. Use `contains` (or the concrete
//! type's `peek`) when existence checks must not disturb recency.

/// Core operations every cache supports.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
/// use lrukit::traits::CoreCache;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCache::new(100);
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key
    /// existed.
    ///
    /// Inserting a new key into a full cache evicts an entry first;
    /// overwriting a resident key never evicts. A capacity-0 cache stores
    /// nothing and always returns `None`.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key, marking the entry as most
    /// recently used.
    ///
    /// The recency update is an observable side effect even though this is
    /// conceptually a read.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating recency.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum capacity.
    fn capacity(&self) -> usize;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
/// use lrukit::traits::{CoreCache, MutableCache};
///
/// fn invalidate<C: MutableCache<u64, String>>(cache: &mut C, keys: &[u64]) {
///     for key in keys {
///         cache.remove(key);
///     }
/// }
///
/// let mut cache = LruCache::new(10);
/// cache.insert(1, "one".to_string());
/// cache.insert(2, "two".to_string());
/// invalidate(&mut cache, &[1]);
/// assert!(!cache.contains(&1));
/// assert!(cache.contains(&2));
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific key-value pair, returning the value if the key
    /// existed.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys, returning `Option<V>` per key in input order.
    ///
    /// The default implementation loops over [`remove`](Self::remove).
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// LRU-specific operations over the recency order.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
/// use lrukit::traits::{CoreCache, LruCacheTrait};
///
/// let mut cache = LruCache::new(3);
/// cache.insert(1, "first");
/// cache.insert(2, "second");
/// cache.insert(3, "third");
///
/// // Key 1 is the eviction candidate until it is touched.
/// assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(1));
/// assert!(cache.touch(&1));
/// assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(2));
///
/// let (key, _) = cache.pop_lru().unwrap();
/// assert_eq!(key, 2);
/// ```
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry, or `None` if the
    /// cache is empty.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Peeks at the least recently used entry without removing it or
    /// updating recency.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks an entry as most recently used without retrieving its value.
    ///
    /// Returns `true` if the key was found.
    fn touch(&mut self, key: &K) -> bool;

    /// Returns the position of a key in recency order (0 = most recent),
    /// or `None` if the key is not resident. O(n) scan.
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Marker trait for caches that are safe to use concurrently.
///
/// Implementors guarantee thread-safe operations; the single-threaded cores
/// do not implement this and must be wrapped (see
/// [`ConcurrentLruCache`](crate::policy::lru::ConcurrentLruCache)).
pub trait ConcurrentCache: Send + Sync {}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal Vec-backed implementation to exercise the default methods.
    struct VecCache {
        data: Vec<(u32, String)>,
        capacity: usize,
    }

    impl CoreCache<u32, String> for VecCache {
        fn insert(&mut self, key: u32, value: String) -> Option<String> {
            if let Some((_, existing)) = self.data.iter_mut().find(|(k, _)| *k == key) {
                return Some(std::mem::replace(existing, value));
            }
            if self.data.len() >= self.capacity {
                self.data.remove(0);
            }
            self.data.push((key, value));
            None
        }

        fn get(&mut self, key: &u32) -> Option<&String> {
            self.data.iter().find(|(k, _)| k == key).map(|(_, v)| v)
        }

        fn contains(&self, key: &u32) -> bool {
            self.data.iter().any(|(k, _)| k == key)
        }

        fn len(&self) -> usize {
            self.data.len()
        }

        fn capacity(&self) -> usize {
            self.capacity
        }

        fn clear(&mut self) {
            self.data.clear();
        }
    }

    impl MutableCache<u32, String> for VecCache {
        fn remove(&mut self, key: &u32) -> Option<String> {
            let pos = self.data.iter().position(|(k, _)| k == key)?;
            Some(self.data.remove(pos).1)
        }
    }

    #[test]
    fn insert_returns_previous_value() {
        let mut cache = VecCache {
            data: Vec::new(),
            capacity: 4,
        };
        assert_eq!(cache.insert(1, "first".to_string()), None);
        assert_eq!(
            cache.insert(1, "second".to_string()),
            Some("first".to_string())
        );
        assert_eq!(cache.get(&1), Some(&"second".to_string()));
    }

    #[test]
    fn is_empty_default_tracks_len() {
        let mut cache = VecCache {
            data: Vec::new(),
            capacity: 4,
        };
        assert!(cache.is_empty());
        cache.insert(1, "one".to_string());
        assert!(!cache.is_empty());
    }

    #[test]
    fn remove_batch_preserves_input_order() {
        let mut cache = VecCache {
            data: Vec::new(),
            capacity: 4,
        };
        cache.insert(1, "one".to_string());
        cache.insert(2, "two".to_string());
        cache.insert(3, "three".to_string());

        let removed = cache.remove_batch(&[1, 99, 3]);
        assert_eq!(
            removed,
            vec![Some("one".to_string()), None, Some("three".to_string())]
        );
        assert_eq!(cache.len(), 1);
    }
}
