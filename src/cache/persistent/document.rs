//! Persisted record shape and the document-store seam.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CacheError, Result};

// == Cache Document ==
/// One cache entry as stored in the document collection.
///
/// `expired_at` is an absolute instant in epoch seconds; 0 means the entry
/// never expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(rename = "_id")]
    pub key: String,
    pub expired_at: i64,
    pub value: String,
}

impl CacheDocument {
    /// Builds a record whose deadline is `now + ttl`, truncated to whole seconds.
    pub fn new(key: impl Into<String>, value: String, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            expired_at: expiry_timestamp(ttl, now),
            value,
        }
    }

    pub fn never_expires(&self) -> bool {
        self.expired_at == 0
    }

    /// True once `now` has reached the stored deadline.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.never_expires() && now.timestamp() >= self.expired_at
    }
}

/// Absolute deadline in epoch seconds for `ttl`; 0 when `ttl` is zero.
fn expiry_timestamp(ttl: Duration, now: DateTime<Utc>) -> i64 {
    if ttl.is_zero() {
        return 0;
    }
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .map_or(i64::MAX, |deadline| deadline.timestamp())
}

// == Document Collection ==
/// Minimal document-store surface the persistent cache needs.
///
/// Each call is one round trip; there is no atomicity across calls.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Fetches the record with `_id == key`.
    async fn find_one(&self, key: &str) -> Result<Option<CacheDocument>>;

    /// Overwrites `expired_at` and `value` of the matching record.
    ///
    /// Returns the number of matched records (0 or 1).
    async fn update_one(&self, document: &CacheDocument) -> Result<u64>;

    /// Inserts a new record. Fails if the `_id` already exists.
    async fn insert_one(&self, document: &CacheDocument) -> Result<()>;

    /// Removes the record with `_id == key`, returning how many were deleted.
    async fn delete_one(&self, key: &str) -> Result<u64>;

    /// Liveness probe.
    async fn ping(&self) -> Result<()>;
}

// == In-Memory Collection ==
/// Process-local [`DocumentCollection`] with document-store semantics.
///
/// Rejects duplicate `_id` inserts like a real collection, which makes it a
/// faithful stand-in for tests and offline runs.
#[derive(Debug, Default)]
pub struct InMemoryCollection {
    documents: Mutex<HashMap<String, CacheDocument>>,
}

impl InMemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stored record for `key`.
    pub fn document(&self, key: &str) -> Option<CacheDocument> {
        self.lock("document").get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock("len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock("len").is_empty()
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, HashMap<String, CacheDocument>> {
        match self.documents.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(op, "Recovered from poisoned collection lock");
                poisoned.into_inner()
            }
        }
    }
}

#[async_trait]
impl DocumentCollection for InMemoryCollection {
    async fn find_one(&self, key: &str) -> Result<Option<CacheDocument>> {
        Ok(self.lock("find_one").get(key).cloned())
    }

    async fn update_one(&self, document: &CacheDocument) -> Result<u64> {
        let mut documents = self.lock("update_one");
        match documents.get_mut(&document.key) {
            Some(existing) => {
                existing.expired_at = document.expired_at;
                existing.value.clone_from(&document.value);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn insert_one(&self, document: &CacheDocument) -> Result<()> {
        let mut documents = self.lock("insert_one");
        if documents.contains_key(&document.key) {
            return Err(CacheError::Backend(format!(
                "duplicate key error: _id {:?}",
                document.key
            )));
        }
        documents.insert(document.key.clone(), document.clone());
        Ok(())
    }

    async fn delete_one(&self, key: &str) -> Result<u64> {
        Ok(u64::from(self.lock("delete_one").remove(key).is_some()))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
