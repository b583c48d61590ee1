//! Error types for vaultify.
//!
//! Each concern gets its own enum; [`Error`] wraps them so callers can
//! match on a single type and still reach the specific failure.

use std::path::PathBuf;

use thiserror::Error;

/// Master key loading and AEAD construction failures.
///
/// All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("invalid key length: expected {expected} bytes, found {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("no master key at {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read key file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write key file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("failed to initialize cipher: {0}")]
    CipherInit(String),

    #[error("unable to determine home directory for the default key path")]
    NoHomeDir,
}

/// Seal/open failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("cipher not initialized: master key has not been loaded")]
    NotInitialized,

    #[error("cipher already initialized")]
    AlreadyInitialized,

    #[error("malformed blob: {len} bytes is shorter than the nonce")]
    MalformedBlob { len: usize },

    #[error("authentication failed: ciphertext was tampered with or sealed under another key")]
    AuthenticationFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Lookup failures from a secret backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("secret expired: {0}")]
    Expired(String),
}

/// Configuration file failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Token whitelist failures.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("unauthorized")]
    Unauthorized,
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// What an external caller is allowed to learn about a failure.
///
/// `Expired` collapses into `NotFound` so a caller cannot probe which names
/// once existed, and tamper/format failures collapse into `BadRequest` so the
/// decryption path is not an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    BadRequest,
    Unauthorized,
    Internal,
}

impl Error {
    /// Classify this error for an external caller.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Store(StoreError::NotFound(_) | StoreError::Expired(_)) => ErrorClass::NotFound,
            Error::Cipher(CipherError::MalformedBlob { .. } | CipherError::AuthenticationFailed) => {
                ErrorClass::BadRequest
            }
            Error::Auth(_) => ErrorClass::Unauthorized,
            _ => ErrorClass::Internal,
        }
    }

    /// Fixed message for external callers, one per [`ErrorClass`].
    pub fn public_message(&self) -> &'static str {
        match self.class() {
            ErrorClass::NotFound => "secret not found",
            ErrorClass::BadRequest => "invalid secret data",
            ErrorClass::Unauthorized => "unauthorized",
            ErrorClass::Internal => "internal error",
        }
    }

    /// Whether the process must refuse to serve after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Key(_) | Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_and_not_found_share_a_class() {
        let missing: Error = StoreError::NotFound("a".into()).into();
        let expired: Error = StoreError::Expired("a".into()).into();

        assert_eq!(missing.class(), expired.class());
        assert_eq!(missing.public_message(), expired.public_message());
        // Internally they stay distinct.
        assert_ne!(missing.to_string(), expired.to_string());
    }

    #[test]
    fn test_tamper_and_malformed_share_a_class() {
        let tampered: Error = CipherError::AuthenticationFailed.into();
        let malformed: Error = CipherError::MalformedBlob { len: 3 }.into();

        assert_eq!(tampered.class(), ErrorClass::BadRequest);
        assert_eq!(malformed.class(), ErrorClass::BadRequest);
        assert_eq!(tampered.public_message(), malformed.public_message());
    }

    #[test]
    fn test_key_errors_are_fatal() {
        let err: Error = KeyError::InvalidKeyLength {
            expected: 32,
            actual: 16,
        }
        .into();
        assert!(err.is_fatal());
        assert_eq!(err.class(), ErrorClass::Internal);

        let err: Error = CipherError::NotInitialized.into();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_key_length_message_names_both_lengths() {
        let err = KeyError::InvalidKeyLength {
            expected: 32,
            actual: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("32"));
        assert!(msg.contains('7'));
    }
}
