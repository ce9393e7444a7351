//! Memory Store Module
//!
//! In-process backend: a shared map of live values with per-entry TTL,
//! evicted on access and by a background sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{binding, Cache, MemoryEntry};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_cleanup_task;

const KIND: &str = "memory";

// == Memory Table ==
/// Key/value table shared between a [`MemoryStore`] and its sweeper.
#[derive(Debug)]
pub struct MemoryTable<T> {
    entries: HashMap<String, MemoryEntry<T>>,
}

impl<T> MemoryTable<T> {
    /// Creates a table seeded with `entries`.
    pub fn new(entries: HashMap<String, MemoryEntry<T>>) -> Self {
        Self { entries }
    }

    /// Returns the live entry for `key`, ignoring expired ones.
    pub fn live(&self, key: &str, now: Instant) -> Option<&MemoryEntry<T>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
    }

    /// Inserts or replaces the entry for `key`.
    pub fn insert(&mut self, key: String, entry: MemoryEntry<T>) {
        self.entries.insert(key, entry);
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes `key` only if it is still expired at `now`.
    pub fn remove_if_expired(&mut self, key: &str, now: Instant) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));
        if expired {
            self.entries.remove(key);
        }
        expired
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    /// Number of entries, expired ones included until they are swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Options ==
/// Construction options for [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryStoreOptions<T> {
    /// TTL applied when `set` gets no explicit expiration; zero = never expire
    pub default_expiration: Duration,
    /// Entries the store starts with
    pub initial_entries: HashMap<String, MemoryEntry<T>>,
    /// Period of the background sweep; zero disables it
    pub cleanup_interval: Duration,
}

impl<T> Default for MemoryStoreOptions<T> {
    fn default() -> Self {
        Self {
            default_expiration: Duration::from_secs(24 * 60 * 60),
            initial_entries: HashMap::new(),
            cleanup_interval: Duration::from_secs(26 * 60 * 60),
        }
    }
}

// == Memory Store ==
/// Cache backend holding live values in process memory.
///
/// Values are cloned in on `set` and cloned out on `get`; nothing goes
/// through the codec. Safe to share across tasks behind an `Arc`.
#[derive(Debug)]
pub struct MemoryStore<T> {
    table: Arc<RwLock<MemoryTable<T>>>,
    default_expiration: Duration,
    sweeper: Option<JoinHandle<()>>,
}

impl<T> MemoryStore<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a store and, when a tokio runtime is available, starts its sweeper.
    pub fn new(options: MemoryStoreOptions<T>) -> Self {
        let table = Arc::new(RwLock::new(MemoryTable::new(options.initial_entries)));

        let sweeper = if options.cleanup_interval.is_zero() {
            None
        } else if Handle::try_current().is_ok() {
            Some(spawn_cleanup_task(table.clone(), options.cleanup_interval))
        } else {
            warn!(
                store = KIND,
                "no tokio runtime available, expired entries are only evicted on access"
            );
            None
        };

        Self {
            table,
            default_expiration: options.default_expiration,
            sweeper,
        }
    }

    /// Returns true while a background sweep task is attached.
    pub fn has_sweeper(&self) -> bool {
        self.sweeper.is_some()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }

    /// Runs one sweep immediately, returning the number of evicted entries.
    pub async fn cleanup_expired(&self) -> usize {
        self.table.write().await.cleanup_expired()
    }
}

impl<T> Drop for MemoryStore<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl<T> Cache<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn kind(&self) -> &'static str {
        KIND
    }

    async fn get(&self, key: &str, out: &mut T) -> Result<()> {
        let now = Instant::now();
        {
            let table = self.table.read().await;
            if let Some(entry) = table.live(key, now) {
                binding::bind(&entry.value, out);
                return Ok(());
            }
        }

        if self.table.write().await.remove_if_expired(key, now) {
            debug!(store = KIND, key, "evicted expired entry on access");
        }
        Err(CacheError::KeyNotFound(key.to_string()))
    }

    async fn set(&self, key: &str, value: &T, expiration: Option<Duration>) -> Result<()> {
        let ttl = expiration.unwrap_or(self.default_expiration);
        let entry = MemoryEntry::new(value.clone(), ttl);
        self.table.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.table.write().await.remove(key);
        Ok(())
    }
}
