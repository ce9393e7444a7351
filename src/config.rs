//! Configuration Module
//!
//! Loads cache configuration from environment variables and turns it into
//! per-store construction options.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{
    ExpiredReadPolicy, MemoryStoreOptions, PersistentStoreOptions, DEFAULT_COLLECTION,
};
use crate::logging::Logger;

// == Backend ==
/// Which cache backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Memory,
    Mongo,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "mongodb" | "mongo" => Ok(Backend::Mongo),
            other => Err(format!("unknown cache backend: {other}")),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend to open
    pub backend: Backend,
    /// Default TTL in seconds; 0 = entries never expire
    pub default_ttl: u64,
    /// Memory-store sweep interval in seconds; 0 disables the sweeper
    pub cleanup_interval: u64,
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// MongoDB database name
    pub database_name: String,
    /// MongoDB collection holding cache records
    pub collection_name: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory` or `mongodb` (default: memory)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 86400)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 93600)
    /// - `MONGODB_URI` - Connection string (default: mongodb://localhost:27017)
    /// - `MONGODB_DATABASE` - Database name (default: cache)
    /// - `MONGODB_COLLECTION` - Collection name (default: caches)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.backend),
            default_ttl: parse_var("CACHE_DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            cleanup_interval: parse_var("CACHE_CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval),
            mongodb_uri: env::var("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            database_name: env::var("MONGODB_DATABASE").unwrap_or(defaults.database_name),
            collection_name: env::var("MONGODB_COLLECTION").unwrap_or(defaults.collection_name),
        }
    }

    /// Options for a memory store with no seeded entries.
    pub fn memory_options<T>(&self) -> MemoryStoreOptions<T> {
        MemoryStoreOptions {
            default_expiration: Duration::from_secs(self.default_ttl),
            initial_entries: HashMap::new(),
            cleanup_interval: Duration::from_secs(self.cleanup_interval),
        }
    }

    /// Options for a persistent store logging to the global subscriber.
    pub fn persistent_options(&self) -> PersistentStoreOptions {
        PersistentStoreOptions {
            connection_uri: self.mongodb_uri.clone(),
            database_name: self.database_name.clone(),
            collection_name: self.collection_name.clone(),
            default_expiration: Duration::from_secs(self.default_ttl),
            expired_reads: ExpiredReadPolicy::default(),
            logger: Logger::global(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            default_ttl: 24 * 60 * 60,
            cleanup_interval: 26 * 60 * 60,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "cache".to_string(),
            collection_name: DEFAULT_COLLECTION.to_string(),
        }
    }
}
