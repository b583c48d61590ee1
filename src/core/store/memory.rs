//! In-memory TTL store.
//!
//! A single `RwLock<HashMap>`: reads share the lock, writes and sweep
//! passes take it exclusively. Sweeps are short relative to their interval,
//! so one exclusive hold per pass is acceptable.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::{Backend, Clock, StoredEntry, Sweeper, SystemClock};
use crate::core::cipher::SealedBlob;
use crate::core::constants::MAX_TTL_SECS;
use crate::error::{Result, StoreError};

struct Shared {
    entries: RwLock<HashMap<String, StoredEntry>>,
    clock: Arc<dyn Clock>,
}

impl Shared {
    // Every mutation is a single insert or remove, so a map behind a
    // poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, StoredEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, StoredEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}

/// Concurrent name → sealed blob map with per-entry expiry.
///
/// Optionally owns a [`Sweeper`] that evicts expired entries in the
/// background; the sweeper stops when the store is shut down or dropped.
pub struct TtlStore {
    shared: Arc<Shared>,
    sweeper: Option<Sweeper>,
}

impl std::fmt::Debug for TtlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlStore")
            .field("entries", &self.shared.read().len())
            .field("sweeper", &self.sweeper.as_ref().map(Sweeper::interval))
            .finish()
    }
}

impl Default for TtlStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlStore {
    /// Empty store on the system clock with no background sweep.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty store reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::new(Shared {
                entries: RwLock::new(HashMap::new()),
                clock,
            }),
            sweeper: None,
        }
    }

    /// Empty store on the system clock that sweeps every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the sweeper thread cannot be spawned.
    pub fn with_sweeper(interval: Duration) -> Result<Self> {
        let mut store = Self::new();
        store.start_sweeper(interval)?;
        Ok(store)
    }

    /// Start (or restart) background eviction every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the sweeper thread cannot be spawned.
    pub fn start_sweeper(&mut self, interval: Duration) -> Result<()> {
        self.stop_sweeper();

        let shared = Arc::clone(&self.shared);
        let sweeper = Sweeper::spawn(interval, move || {
            let evicted = shared.evict_expired();
            if evicted > 0 {
                debug!(evicted, "swept expired secrets");
            }
        })?;
        self.sweeper = Some(sweeper);
        Ok(())
    }

    /// Stop background eviction. Stored entries are kept.
    pub fn stop_sweeper(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.stop();
        }
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper.is_some()
    }

    /// Stop the sweeper and drop every entry.
    pub fn shutdown(&mut self) {
        self.stop_sweeper();
        self.shared.write().clear();
    }

    fn expiry(&self, ttl_secs: i64) -> Instant {
        let now = self.shared.clock.now();
        if ttl_secs <= 0 {
            return now;
        }
        now + Duration::from_secs(ttl_secs.min(MAX_TTL_SECS) as u64)
    }
}

impl Backend for TtlStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn put(&self, name: &str, blob: SealedBlob, ttl_secs: i64) -> Result<()> {
        let expires_at = self.expiry(ttl_secs);
        trace!(name, ttl_secs, "storing secret");

        self.shared
            .write()
            .insert(name.to_string(), StoredEntry { blob, expires_at });
        Ok(())
    }

    fn get(&self, name: &str) -> Result<SealedBlob> {
        {
            let entries = self.shared.read();
            let entry = entries
                .get(name)
                .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
            if !entry.is_expired(self.shared.clock.now()) {
                return Ok(entry.blob.clone());
            }
        }

        // Expired: reclaim it now instead of waiting for the sweep, unless a
        // concurrent put already replaced it.
        let now = self.shared.clock.now();
        let mut entries = self.shared.write();
        if entries.get(name).is_some_and(|e| e.is_expired(now)) {
            entries.remove(name);
        }
        trace!(name, "secret expired");
        Err(StoreError::Expired(name.to_string()).into())
    }

    fn remove(&self, name: &str) -> Result<bool> {
        Ok(self.shared.write().remove(name).is_some())
    }

    fn len(&self) -> usize {
        self.shared.read().len()
    }

    fn evict_expired(&self) -> usize {
        self.shared.evict_expired()
    }
}
