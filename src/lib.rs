//! Mini Cache - A uniform key/value cache
//!
//! One `Cache<T>` contract backed either by process memory (TTL plus a
//! background sweep) or by a MongoDB collection (lazy expiration on read).

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod tasks;

pub use cache::{Cache, MemoryStore, PersistentStore, NO_EXPIRATION};
pub use config::Config;
pub use error::{CacheError, Result};
pub use logging::Logger;
