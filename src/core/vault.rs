//! The primary interface for vaultify operations.
//!
//! A [`Vault`] seals plaintext before handing it to a backend and opens it on
//! the way out. It holds no state of its own beyond the two parts.

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::cipher::{AesGcm, Cipher};
use crate::core::config::Config;
use crate::core::keys::KeyManager;
use crate::core::store::{Backend, TtlStore};
use crate::error::Result;

/// Cipher plus backend behind `put`/`get`.
#[derive(Debug)]
pub struct Vault<C = AesGcm, B = TtlStore> {
    cipher: C,
    backend: B,
}

impl Vault<AesGcm, TtlStore> {
    /// Build the default vault from configuration.
    ///
    /// Loads (or creates) the master key and starts an in-memory store
    /// with background sweeping.
    ///
    /// # Errors
    ///
    /// Returns `KeyError` if the master key cannot be loaded; the caller
    /// must not serve requests in that case.
    pub fn open(config: &Config) -> Result<Self> {
        let key_path = config.key_path()?;
        let ctx = KeyManager::new(&key_path).initialize()?;
        let store = TtlStore::with_sweeper(config.sweep_interval())?;

        info!(
            key_path = %key_path.display(),
            sweep_interval_secs = config.store.sweep_interval_secs,
            "vault opened"
        );
        Ok(Self::new(AesGcm::with_context(ctx), store))
    }

    /// Stop background sweeping and drop all held secrets.
    pub fn shutdown(&mut self) {
        self.backend.shutdown();
        debug!("vault shut down");
    }
}

impl<C: Cipher, B: Backend> Vault<C, B> {
    pub fn new(cipher: C, backend: B) -> Self {
        Self { cipher, backend }
    }

    /// Seal `plaintext` and store it under `name` for `ttl_secs` seconds.
    ///
    /// Replaces any existing secret of the same name. Nothing is stored if
    /// sealing fails.
    ///
    /// # Errors
    ///
    /// Returns the cipher's error unchanged, or a backend failure.
    pub fn put(&self, name: &str, plaintext: &[u8], ttl_secs: i64) -> Result<()> {
        let blob = self.cipher.seal(plaintext)?;
        self.backend.put(name, blob, ttl_secs)?;
        debug!(name, ttl_secs, backend = self.backend.name(), "secret stored");
        Ok(())
    }

    /// Fetch and decrypt the secret stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound`/`Expired` without attempting
    /// decryption, or `CipherError::AuthenticationFailed` if the stored blob
    /// does not verify under the current key.
    pub fn get(&self, name: &str) -> Result<Zeroizing<Vec<u8>>> {
        let blob = self.backend.get(name)?;
        let plaintext = self.cipher.open(&blob)?;
        debug!(name, "secret fetched");
        Ok(plaintext)
    }

    /// Delete `name`. Returns whether anything was removed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        self.backend.remove(name)
    }

    /// Number of entries held by the backend.
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
