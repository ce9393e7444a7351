use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Uniform key/value contract satisfied by every cache backend.
///
/// `get` writes into a caller-owned slot and leaves it untouched on error.
/// `expiration` on `set` overrides the store default; passing
/// `Some(`[`NO_EXPIRATION`]`)` stores an entry that never expires.
///
/// [`NO_EXPIRATION`]: super::NO_EXPIRATION
#[async_trait]
pub trait Cache<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Short backend name for logs (e.g. "memory", "mongodb").
    fn kind(&self) -> &'static str;

    /// Copies the value stored under `key` into `out`.
    async fn get(&self, key: &str, out: &mut T) -> Result<()>;

    /// Stores a copy of `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: &T, expiration: Option<Duration>) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Returns the value stored under `key` by value.
    async fn fetch(&self, key: &str) -> Result<T>
    where
        T: Default,
    {
        let mut out = T::default();
        self.get(key, &mut out).await?;
        Ok(out)
    }
}
