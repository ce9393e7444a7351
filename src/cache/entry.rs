//! Memory Entry Module
//!
//! Defines the structure for individual memory-store entries with TTL support.

use std::time::{Duration, Instant};

// == Memory Entry ==
/// A live value held by the memory store plus its optional deadline.
#[derive(Debug, Clone)]
pub struct MemoryEntry<T> {
    /// The stored value
    pub value: T,
    /// Deadline after which the entry is expired, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<T> MemoryEntry<T> {
    // == Constructor ==
    /// Creates a new entry that expires after `ttl`.
    ///
    /// A zero `ttl`, or one too large to represent as a deadline, means the
    /// entry never expires.
    pub fn new(value: T, ttl: Duration) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Instant::now().checked_add(ttl)
        };

        Self { value, expires_at }
    }

    /// Creates an entry that never expires.
    pub fn persistent(value: T) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    // == Is Expired ==
    /// Checks expiry against `now`.
    ///
    /// An entry is expired once `now` reaches its deadline.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}
