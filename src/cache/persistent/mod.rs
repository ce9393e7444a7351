//! Persistent Store Module
//!
//! Cache backend over a document collection. Values are JSON-encoded, writes
//! are an update followed by an insert when nothing matched, and expiry is
//! enforced lazily when an entry is read.

mod document;
#[cfg(feature = "mongodb")]
mod mongo;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::cache::{binding, codec, Cache};
use crate::error::{CacheError, Result};
use crate::logging::Logger;

pub use document::{CacheDocument, DocumentCollection, InMemoryCollection};
#[cfg(feature = "mongodb")]
pub use mongo::MongoCollection;

/// Collection name used when the options leave it empty.
pub const DEFAULT_COLLECTION: &str = "caches";

// == Expired Read Policy ==
/// What `get` returns for an entry found past its deadline.
///
/// Either way the entry is deleted before `get` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpiredReadPolicy {
    /// Hand back the value that was just read
    #[default]
    ReturnStale,
    /// Report the entry as missing
    Miss,
}

// == Options ==
/// Construction options for [`PersistentStore`].
#[derive(Debug, Clone)]
pub struct PersistentStoreOptions {
    pub connection_uri: String,
    pub database_name: String,
    /// Collection holding the cache records; empty means [`DEFAULT_COLLECTION`]
    pub collection_name: String,
    /// TTL applied when `set` gets no explicit expiration; zero = never expire
    pub default_expiration: Duration,
    pub expired_reads: ExpiredReadPolicy,
    pub logger: Logger,
}

impl PersistentStoreOptions {
    /// Collection name with the default applied.
    pub fn collection(&self) -> &str {
        if self.collection_name.is_empty() {
            DEFAULT_COLLECTION
        } else {
            &self.collection_name
        }
    }
}

impl Default for PersistentStoreOptions {
    fn default() -> Self {
        Self {
            connection_uri: "mongodb://localhost:27017".to_string(),
            database_name: "cache".to_string(),
            collection_name: DEFAULT_COLLECTION.to_string(),
            default_expiration: Duration::ZERO,
            expired_reads: ExpiredReadPolicy::default(),
            logger: Logger::default(),
        }
    }
}

// == Persistent Store ==
/// Cache backend persisting JSON payloads in a document collection.
///
/// Every failure is logged through the configured [`Logger`] with the
/// operation, key and cause before it is returned.
#[derive(Debug)]
pub struct PersistentStore<C> {
    collection: C,
    kind: &'static str,
    default_expiration: Duration,
    expired_reads: ExpiredReadPolicy,
    logger: Logger,
}

#[cfg(feature = "mongodb")]
impl PersistentStore<MongoCollection> {
    /// Connects to MongoDB and probes the server.
    ///
    /// A client that cannot be built is an error. A failed probe is only
    /// logged; later operations report connectivity problems themselves.
    pub async fn connect(options: &PersistentStoreOptions) -> Result<Self> {
        let collection = MongoCollection::connect(
            &options.connection_uri,
            &options.database_name,
            options.collection(),
        )
        .await?;

        let store = Self::new(collection, options).with_kind("mongodb");
        if store.ping().await.is_ok() {
            store.logger.in_scope(|| {
                debug!(
                    store = store.kind,
                    database = %options.database_name,
                    collection = options.collection(),
                    "connected"
                )
            });
        }
        Ok(store)
    }
}

impl<C> PersistentStore<C>
where
    C: DocumentCollection,
{
    /// Builds a store over an already connected collection.
    pub fn new(collection: C, options: &PersistentStoreOptions) -> Self {
        Self {
            collection,
            kind: "document",
            default_expiration: options.default_expiration,
            expired_reads: options.expired_reads,
            logger: options.logger.clone(),
        }
    }

    /// Overrides the backend name reported by `kind()` and in log lines.
    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Probes the backing store, logging a failure at WARN.
    pub async fn ping(&self) -> Result<()> {
        let result = self.collection.ping().await;
        if let Err(err) = &result {
            self.logger
                .in_scope(|| warn!(store = self.kind, error = %err, "liveness probe failed"));
        }
        result
    }

    fn log_failure(&self, op: &'static str, key: &str, err: &CacheError) {
        self.logger.in_scope(|| {
            if err.is_not_found() {
                debug!(store = self.kind, op, key, error = %err, "cache miss");
            } else {
                error!(store = self.kind, op, key, error = %err, "cache operation failed");
            }
        });
    }

    /// Logs `err` for `op`/`key` and hands it back for `?`.
    fn fail(&self, op: &'static str, key: &str, err: CacheError) -> CacheError {
        self.log_failure(op, key, &err);
        err
    }
}

#[async_trait]
impl<T, C> Cache<T> for PersistentStore<C>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
    C: DocumentCollection,
{
    fn kind(&self) -> &'static str {
        self.kind
    }

    async fn get(&self, key: &str, out: &mut T) -> Result<()> {
        let document = self
            .collection
            .find_one(key)
            .await
            .map_err(|err| self.fail("get", key, err))?
            .ok_or_else(|| self.fail("get", key, CacheError::KeyNotFound(key.to_string())))?;

        if document.is_expired_at(Utc::now()) {
            self.collection
                .delete_one(key)
                .await
                .map_err(|err| self.fail("delete", key, err))?;
            self.logger
                .in_scope(|| debug!(store = self.kind, key, "removed expired entry on read"));

            if self.expired_reads == ExpiredReadPolicy::Miss {
                return Err(self.fail("get", key, CacheError::KeyNotFound(key.to_string())));
            }
        }

        let value: T =
            codec::decode(document.value.as_bytes()).map_err(|err| self.fail("decode", key, err))?;
        binding::bind_owned(value, out);
        Ok(())
    }

    async fn set(&self, key: &str, value: &T, expiration: Option<Duration>) -> Result<()> {
        let ttl = expiration.unwrap_or(self.default_expiration);
        let payload = codec::encode(value).map_err(|err| self.fail("encode", key, err))?;
        let document = CacheDocument::new(key, payload, ttl, Utc::now());

        let matched = self
            .collection
            .update_one(&document)
            .await
            .map_err(|err| self.fail("set", key, err))?;
        if matched > 0 {
            self.logger
                .in_scope(|| debug!(store = self.kind, key, "updated existing entry"));
            return Ok(());
        }

        self.collection
            .insert_one(&document)
            .await
            .map_err(|err| self.fail("set", key, err))?;
        self.logger
            .in_scope(|| debug!(store = self.kind, key, "inserted new entry"));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.collection
            .delete_one(key)
            .await
            .map_err(|err| self.fail("delete", key, err))?;
        Ok(())
    }
}
