//! Convenience re-exports for common usage.
//!
//! ```
//! use lrukit::prelude::*;
//!
//! let mut cache = LruCache::new(2);
//! cache.insert(1, "one");
//! assert_eq!(cache.get(&1), Some(&"one"));
//! ```

pub use crate::ds::{RecencyList, SlotArena, SlotId};
pub use crate::error::InvariantError;
pub use crate::policy::lru::LruCache;
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

#[cfg(feature = "concurrency")]
pub use crate::policy::lru::ConcurrentLruCache;
#[cfg(feature = "concurrency")]
pub use crate::traits::ConcurrentCache;

#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LruMetricsSnapshot;
