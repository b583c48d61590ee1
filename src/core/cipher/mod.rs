//! Authenticated encryption of secret values.
//!
//! Every secret is stored as a [`SealedBlob`]: a fresh random nonce followed
//! by the ciphertext and its authentication tag. The layout is the same no
//! matter which backend holds the blob.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file next to `aes.rs`
//! 3. Re-export from this module

use zeroize::Zeroizing;

use crate::core::constants::NONCE_SIZE;
use crate::error::Result;

mod aes;

pub use aes::AesGcm;

/// Nonce-prefixed ciphertext: `nonce || ciphertext || tag`.
///
/// Opaque to storage. Construction never validates; [`Cipher::open`] does.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedBlob(Vec<u8>);

impl SealedBlob {
    /// Wrap raw bytes, e.g. as read back from a durable store.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The nonce prefix, or `None` if the blob is too short to carry one.
    pub fn nonce(&self) -> Option<&[u8]> {
        self.0.get(..NONCE_SIZE)
    }
}

impl std::fmt::Debug for SealedBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedBlob")
            .field("len", &self.0.len())
            .finish()
    }
}

impl From<Vec<u8>> for SealedBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Cryptographic backend trait.
///
/// Implementations must be safe to call from many threads at once.
pub trait Cipher: Send + Sync {
    /// Encrypt plaintext under a fresh nonce.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::NotInitialized` if no key has been installed,
    /// or `CipherError::EncryptionFailed` if the AEAD rejects the input.
    fn seal(&self, plaintext: &[u8]) -> Result<SealedBlob>;

    /// Verify and decrypt a sealed blob.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::NotInitialized` if no key has been installed,
    /// `CipherError::MalformedBlob` if the blob is shorter than a nonce, or
    /// `CipherError::AuthenticationFailed` if the tag does not verify.
    fn open(&self, blob: &SealedBlob) -> Result<Zeroizing<Vec<u8>>>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}
