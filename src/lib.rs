//! Keyed Cache - a single-flight TTL cache for async producers
//!
//! Concurrent requests for the same key share one producer invocation,
//! successful results are kept until their TTL runs out, and a periodic
//! sweep purges expired entries and reclaims in-flight work that never
//! settled.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{CacheStats, KeyedCache, SweepReport};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, ServerConfig};
pub use error::{ApiError, ResolveError};
pub use tasks::{spawn_sweep_task, SweepHandle};
