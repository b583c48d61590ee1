//! Master key lifecycle.
//!
//! Loads the master key from disk, or generates and persists one on first
//! start, then builds the AES-256-GCM context every seal/open runs through.
//! The key file is raw bytes, exactly [`KEY_SIZE`] long, no header.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use aes_gcm::aead::KeyInit;
use aes_gcm::{Aes256Gcm, Key};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::core::constants::{KEY_DIR, KEY_FILE, KEY_SIZE};
use crate::error::{KeyError, Result};

/// Keyed AEAD instance derived from the master key.
///
/// Immutable once built and safe to share across threads. The key bytes
/// never leave this type and `Debug` does not print them.
#[derive(Clone)]
pub struct AeadContext {
    aead: Aes256Gcm,
}

impl AeadContext {
    /// Build a context from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeyLength` unless `key` is exactly
    /// [`KEY_SIZE`] bytes, or `KeyError::CipherInit` if the cipher rejects it.
    pub fn from_key(key: &[u8]) -> Result<Self> {
        if key.len() != KEY_SIZE {
            return Err(KeyError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: key.len(),
            }
            .into());
        }

        let aead =
            Aes256Gcm::new_from_slice(key).map_err(|e| KeyError::CipherInit(e.to_string()))?;

        Ok(Self { aead })
    }

    /// Build a context around a freshly generated key that is never persisted.
    pub fn ephemeral() -> Self {
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        OsRng.fill_bytes(&mut *key);
        Self {
            aead: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key)),
        }
    }

    pub(crate) fn aead(&self) -> &Aes256Gcm {
        &self.aead
    }
}

impl std::fmt::Debug for AeadContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AeadContext")
            .field("algorithm", &"AES-256-GCM")
            .finish_non_exhaustive()
    }
}

/// Where the master key came from during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// An existing key file was read.
    Loaded,
    /// No key file existed; a new one was generated and written.
    Generated,
}

/// Validate file permissions (Unix only).
#[cfg(unix)]
fn check_key_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    use crate::core::constants::KEY_FILE_MODE;

    let Ok(metadata) = fs::metadata(path) else {
        return;
    };
    let actual = metadata.permissions().mode() & 0o777;
    if actual != KEY_FILE_MODE {
        warn!(
            path = %path.display(),
            expected = %format!("{:o}", KEY_FILE_MODE),
            actual = %format!("{:o}", actual),
            "master key file has loose permissions"
        );
    }
}

/// Owns the master key file for one process.
#[derive(Debug, Clone)]
pub struct KeyManager {
    path: PathBuf,
}

impl KeyManager {
    /// Manage the key file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default key location (`~/.vaultify/master.key`).
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NoHomeDir` if HOME cannot be resolved.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(KeyError::NoHomeDir)?;
        Ok(home.join(KEY_DIR).join(KEY_FILE))
    }

    /// Path of the managed key file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a key file is already present.
    pub fn has_key(&self) -> bool {
        self.path.exists()
    }

    /// Load an existing master key without ever creating one.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Missing` if no key file exists, otherwise the same
    /// errors as [`initialize`](Self::initialize).
    pub fn load(&self) -> Result<AeadContext> {
        let key = match fs::read(&self.path) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(KeyError::Missing(self.path.clone()).into())
            }
            Err(e) => return Err(KeyError::ReadFailed(e).into()),
        };
        #[cfg(unix)]
        check_key_permissions(&self.path);

        AeadContext::from_key(&key)
    }

    /// Load or create the master key and build the AEAD context.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeyLength` if the file holds anything but
    /// [`KEY_SIZE`] bytes, `KeyError::ReadFailed`/`WriteFailed` on IO
    /// failure, or `KeyError::CipherInit` if the cipher cannot be built.
    pub fn initialize(&self) -> Result<AeadContext> {
        self.initialize_with_origin().map(|(ctx, _)| ctx)
    }

    /// Same as [`initialize`](Self::initialize), also reporting whether the
    /// key was loaded or generated.
    pub fn initialize_with_origin(&self) -> Result<(AeadContext, KeyOrigin)> {
        let (key, origin) = match fs::read(&self.path) {
            Ok(bytes) => {
                debug!(path = %self.path.display(), "loading master key");
                #[cfg(unix)]
                check_key_permissions(&self.path);
                (Zeroizing::new(bytes), KeyOrigin::Loaded)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => match self.generate()? {
                Some(key) => (key, KeyOrigin::Generated),
                // Lost a creation race; the winner's file is complete once linked.
                None => (
                    Zeroizing::new(fs::read(&self.path).map_err(KeyError::ReadFailed)?),
                    KeyOrigin::Loaded,
                ),
            },
            Err(e) => return Err(KeyError::ReadFailed(e).into()),
        };

        let ctx = AeadContext::from_key(&key)?;
        Ok((ctx, origin))
    }

    /// Generate a key and write it with owner-only permissions.
    ///
    /// Returns `None` if the file appeared in the meantime; an existing key
    /// file is never overwritten.
    fn generate(&self) -> Result<Option<Zeroizing<Vec<u8>>>> {
        let mut key = Zeroizing::new(vec![0u8; KEY_SIZE]);
        OsRng.fill_bytes(&mut key);

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(KeyError::WriteFailed)?;
        }

        let created = self.persist(&key, |file, bytes| {
            file.write_all(bytes)?;
            file.sync_all()
        })?;
        if !created {
            return Ok(None);
        }

        info!(path = %self.path.display(), "generated new master key");
        Ok(Some(key))
    }

    /// Write `key` to a sibling temp file, then hard-link it into place.
    ///
    /// The key path only ever names a complete file. Returns `false` if the
    /// key path already exists. The temp file is removed on every path.
    fn persist<F>(&self, key: &[u8], write: F) -> Result<bool>
    where
        F: FnOnce(&mut fs::File, &[u8]) -> io::Result<()>,
    {
        let tmp = self.temp_path();

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;

            use crate::core::constants::KEY_FILE_MODE;
            options.mode(KEY_FILE_MODE);
        }

        let mut file = options.open(&tmp).map_err(KeyError::WriteFailed)?;
        let written = write(&mut file, key);
        drop(file);
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(KeyError::WriteFailed(e).into());
        }

        let linked = fs::hard_link(&tmp, &self.path);
        let _ = fs::remove_file(&tmp);
        match linked {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(KeyError::WriteFailed(e).into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| KEY_FILE.to_string());
        self.path
            .with_file_name(format!(".{}.{:016x}.tmp", name, OsRng.next_u64()))
    }
}
