//! Eviction policy implementations.

pub mod lru;

pub use lru::LruCache;

#[cfg(feature = "concurrency")]
pub use lru::ConcurrentLruCache;
