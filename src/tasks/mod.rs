//! Background Tasks Module
//!
//! Contains background tasks owned by a cache's lifecycle.
//!
//! # Tasks
//! - Sweep: Purges expired entries and stale in-flight registrations at the configured interval

mod sweep;

pub use sweep::{spawn_sweep_task, SweepHandle};
