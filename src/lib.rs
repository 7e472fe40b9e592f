//! lrukit: bounded least-recently-used cache primitives.
//!
//! The crate centers on [`policy::lru::LruCache`], a fixed-capacity key/value
//! store that evicts the least recently touched entry when full. Recency is
//! tracked by a doubly linked list over stable slot-arena handles
//! ([`ds::RecencyList`]), avoiding raw pointers in the policy core.

pub mod ds;
pub mod error;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod policy;
pub mod prelude;
pub mod traits;
