//! Background Tasks Module
//!
//! Contains background tasks that run alongside the cache stores.
//!
//! # Tasks
//! - TTL Cleanup: Sweeps expired memory-store entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
