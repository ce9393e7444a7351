//! Store construction from [`Config`].

use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::cache::{Cache, MemoryStore};
use crate::config::{Backend, Config};
use crate::error::Result;

/// Opens the backend selected by `config` as a trait object.
pub async fn open<T>(config: &Config) -> Result<Box<dyn Cache<T>>>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let store: Box<dyn Cache<T>> = match config.backend {
        Backend::Memory => Box::new(MemoryStore::new(config.memory_options())),
        Backend::Mongo => open_mongo(config).await?,
    };

    info!(store = store.kind(), "Cache store initialized");
    Ok(store)
}

#[cfg(feature = "mongodb")]
async fn open_mongo<T>(config: &Config) -> Result<Box<dyn Cache<T>>>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let store = crate::cache::PersistentStore::connect(&config.persistent_options()).await?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "mongodb"))]
async fn open_mongo<T>(_config: &Config) -> Result<Box<dyn Cache<T>>>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    Err(crate::error::CacheError::Config(
        "mongodb backend selected but the `mongodb` feature is disabled".to_string(),
    ))
}
