//! AES-256-GCM backend.

use std::sync::OnceLock;

use aes_gcm::aead::Aead;
use aes_gcm::Nonce;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::trace;
use zeroize::Zeroizing;

use super::{Cipher, SealedBlob};
use crate::core::constants::{NONCE_SIZE, TAG_SIZE};
use crate::core::keys::AeadContext;
use crate::error::{CipherError, Result};

/// AES-256-GCM cipher over a single AEAD context.
///
/// May be created empty and have its context installed once the master key
/// is loaded; sealing or opening before that fails with `NotInitialized`.
#[derive(Debug, Default)]
pub struct AesGcm {
    ctx: OnceLock<AeadContext>,
}

impl AesGcm {
    /// Create a cipher with no key installed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cipher ready to use.
    pub fn with_context(ctx: AeadContext) -> Self {
        let cipher = Self::new();
        // A fresh OnceLock is always empty.
        let _ = cipher.ctx.set(ctx);
        cipher
    }

    /// Install the AEAD context. Only the first call succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::AlreadyInitialized` on a second call.
    pub fn install(&self, ctx: AeadContext) -> Result<()> {
        self.ctx
            .set(ctx)
            .map_err(|_| CipherError::AlreadyInitialized.into())
    }

    pub fn is_initialized(&self) -> bool {
        self.ctx.get().is_some()
    }

    fn context(&self) -> Result<&AeadContext> {
        self.ctx
            .get()
            .ok_or_else(|| CipherError::NotInitialized.into())
    }
}

impl Cipher for AesGcm {
    fn name(&self) -> &'static str {
        "aes-256-gcm"
    }

    fn seal(&self, plaintext: &[u8]) -> Result<SealedBlob> {
        let ctx = self.context()?;
        trace!(plaintext_len = plaintext.len(), "sealing");

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = ctx
            .aead()
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        debug_assert_eq!(blob.len(), NONCE_SIZE + plaintext.len() + TAG_SIZE);

        trace!(blob_len = blob.len(), "sealed");
        Ok(SealedBlob::from_bytes(blob))
    }

    fn open(&self, blob: &SealedBlob) -> Result<Zeroizing<Vec<u8>>> {
        let ctx = self.context()?;
        trace!(blob_len = blob.len(), "opening");

        let bytes = blob.as_bytes();
        if bytes.len() < NONCE_SIZE {
            return Err(CipherError::MalformedBlob { len: bytes.len() }.into());
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);

        let plaintext = ctx
            .aead()
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::AuthenticationFailed)?;

        Ok(Zeroizing::new(plaintext))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::constants::KEY_SIZE;
    use crate::error::Error;

    fn cipher() -> AesGcm {
        AesGcm::with_context(AeadContext::ephemeral())
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let cipher = cipher();
        let blob = cipher.seal(b"super secret password 123!").unwrap();

        assert_ne!(blob.as_bytes(), b"super secret password 123!");
        let opened = cipher.open(&blob).unwrap();
        assert_eq!(opened.as_slice(), b"super secret password 123!");
    }

    #[test]
    fn test_seal_empty_plaintext() {
        let cipher = cipher();
        let blob = cipher.seal(b"").unwrap();

        assert_eq!(blob.len(), NONCE_SIZE + TAG_SIZE);
        assert!(cipher.open(&blob).unwrap().is_empty());
    }

    #[test]
    fn test_blob_layout() {
        let cipher = cipher();
        let blob = cipher.seal(&[0u8; 100]).unwrap();
        assert_eq!(blob.len(), NONCE_SIZE + 100 + TAG_SIZE);
    }

    #[test]
    fn test_nonces_are_unique() {
        let cipher = cipher();
        let mut seen = HashSet::new();
        for i in 0..10_000u32 {
            let blob = cipher.seal(&i.to_le_bytes()).unwrap();
            let nonce = blob.nonce().unwrap().to_vec();
            assert!(seen.insert(nonce), "nonce reused at iteration {}", i);
        }
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn test_identical_plaintexts_seal_differently() {
        let cipher = cipher();
        let a = cipher.seal(b"same").unwrap();
        let b = cipher.seal(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_every_bit_flip_is_detected() {
        let cipher = cipher();
        let blob = cipher.seal(b"hello").unwrap();

        for byte in 0..blob.len() {
            for bit in 0..8 {
                let mut bytes = blob.clone().into_bytes();
                bytes[byte] ^= 1 << bit;
                let err = cipher.open(&SealedBlob::from_bytes(bytes)).unwrap_err();
                assert!(
                    matches!(err, Error::Cipher(CipherError::AuthenticationFailed)),
                    "flip at byte {} bit {} gave {:?}",
                    byte,
                    bit,
                    err
                );
            }
        }
    }

    #[test]
    fn test_truncated_tag_fails_authentication() {
        let cipher = cipher();
        let mut bytes = cipher.seal(b"hello").unwrap().into_bytes();
        bytes.truncate(bytes.len() - 1);

        let err = cipher.open(&SealedBlob::from_bytes(bytes)).unwrap_err();
        assert!(matches!(
            err,
            Error::Cipher(CipherError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_short_blob_is_malformed() {
        let cipher = cipher();
        for len in [0, 1, NONCE_SIZE - 1] {
            let err = cipher
                .open(&SealedBlob::from_bytes(vec![0; len]))
                .unwrap_err();
            assert!(
                matches!(err, Error::Cipher(CipherError::MalformedBlob { len: l }) if l == len),
                "len {} gave {:?}",
                len,
                err
            );
        }
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let a = AesGcm::with_context(AeadContext::from_key(&[1u8; KEY_SIZE]).unwrap());
        let b = AesGcm::with_context(AeadContext::from_key(&[2u8; KEY_SIZE]).unwrap());

        let blob = a.seal(b"for a only").unwrap();
        let err = b.open(&blob).unwrap_err();
        assert!(matches!(
            err,
            Error::Cipher(CipherError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_use_before_install_fails() {
        let cipher = AesGcm::new();
        assert!(!cipher.is_initialized());

        assert!(matches!(
            cipher.seal(b"x").unwrap_err(),
            Error::Cipher(CipherError::NotInitialized)
        ));
        assert!(matches!(
            cipher
                .open(&SealedBlob::from_bytes(vec![0; 40]))
                .unwrap_err(),
            Error::Cipher(CipherError::NotInitialized)
        ));

        cipher.install(AeadContext::ephemeral()).unwrap();
        assert!(cipher.is_initialized());
        let blob = cipher.seal(b"x").unwrap();
        assert_eq!(cipher.open(&blob).unwrap().as_slice(), b"x");
    }

    #[test]
    fn test_install_twice_fails() {
        let cipher = cipher();
        let err = cipher.install(AeadContext::ephemeral()).unwrap_err();
        assert!(matches!(
            err,
            Error::Cipher(CipherError::AlreadyInitialized)
        ));
    }
}
