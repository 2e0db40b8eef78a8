//! Cache Module
//!
//! Provides the single-flight keyed cache with TTL expiration and a stale
//! in-flight sweep.

mod entry;
mod flight;
mod keyed;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use keyed::KeyedCache;
pub use stats::{CacheStats, SweepReport};
pub use store::ResultStore;
