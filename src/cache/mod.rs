//! Cache Module
//!
//! One key/value contract ([`Cache`]) with two backends: an in-process
//! memory store and a persistent document-collection store.

pub mod binding;
pub mod codec;
mod entry;
mod factory;
mod memory;
mod persistent;
mod traits;

#[cfg(test)]
mod property_tests;

use std::time::Duration;

// Re-export public types
pub use entry::MemoryEntry;
pub use factory::open;
pub use memory::{MemoryStore, MemoryStoreOptions, MemoryTable};
#[cfg(feature = "mongodb")]
pub use persistent::MongoCollection;
pub use persistent::{
    CacheDocument, DocumentCollection, ExpiredReadPolicy, InMemoryCollection, PersistentStore,
    PersistentStoreOptions, DEFAULT_COLLECTION,
};
pub use traits::Cache;

// == Public Constants ==
/// Expiration that keeps an entry until it is deleted or overwritten.
pub const NO_EXPIRATION: Duration = Duration::ZERO;
