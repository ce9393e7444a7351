//! Codec Module
//!
//! JSON encoding of cached values. Payloads are UTF-8 text so they can be
//! stored as a plain string field and inspected by hand.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};

/// Encodes `value` as JSON text.
pub fn encode<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(CacheError::Marshal)
}

/// Decodes a JSON payload into `T`.
pub fn decode<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(bytes).map_err(CacheError::Unmarshal)
}
