//! Secret storage backends.
//!
//! A backend maps a secret name to a [`SealedBlob`] and an expiry. Expiry is
//! enforced on every read; sweeping is only memory reclamation.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Backend` trait
//! 2. Add the implementation in a new file (e.g., `postgres.rs`)
//! 3. Re-export from this module
//!
//! A durable backend must accept and return the same `SealedBlob` bytes the
//! in-memory store does, and must report `Expired` for entries past their
//! expiry even if it has not deleted them yet.

use std::time::Instant;

use crate::core::cipher::SealedBlob;
use crate::error::Result;

mod clock;
mod memory;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::TtlStore;
pub use sweeper::Sweeper;

/// One stored secret.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub blob: SealedBlob,
    pub expires_at: Instant,
}

impl StoredEntry {
    /// An entry is expired from its expiry instant onward, so a zero TTL is
    /// already expired when written.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Storage trait for sealed secrets.
pub trait Backend: Send + Sync {
    /// Insert or replace `name`, expiring `ttl_secs` seconds from now.
    ///
    /// Zero or negative TTLs are accepted and yield an expired entry.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself fails.
    fn put(&self, name: &str, blob: SealedBlob, ttl_secs: i64) -> Result<()>;

    /// Fetch the blob stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if absent, or `StoreError::Expired` if
    /// present but past its expiry.
    fn get(&self, name: &str) -> Result<SealedBlob>;

    /// Delete `name`. Returns whether an entry was removed.
    fn remove(&self, name: &str) -> Result<bool>;

    /// Entries currently held, including expired ones not yet swept.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry, returning how many were removed.
    fn evict_expired(&self) -> usize;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}
