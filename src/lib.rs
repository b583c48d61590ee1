//! Vaultify - An ephemeral secret vault.
//!
//! Secrets are sealed with AES-256-GCM under a master key kept on disk and
//! held in memory until their TTL runs out.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── keygen        # Create or verify the master key
//! │   ├── check         # Validate config and key
//! │   └── session       # Line-oriented put/get against a live vault
//! └── core/             # Core library components
//!     ├── config        # vaultify.toml management
//!     ├── keys          # Master key lifecycle, AEAD context
//!     ├── cipher/       # Seal/open
//!     │   ├── mod       # Cipher trait, SealedBlob
//!     │   └── aes       # AES-256-GCM implementation
//!     ├── store/        # Secret backends
//!     │   ├── mod       # Backend trait
//!     │   ├── memory    # In-memory TTL store
//!     │   └── sweeper   # Background eviction task
//!     ├── auth          # Token whitelist
//!     └── vault         # Seal-then-store composition
//! ```
//!
//! # Example
//!
//! ```
//! use vaultify::core::cipher::AesGcm;
//! use vaultify::core::keys::AeadContext;
//! use vaultify::core::store::TtlStore;
//! use vaultify::core::vault::Vault;
//!
//! let vault = Vault::new(AesGcm::with_context(AeadContext::ephemeral()), TtlStore::new());
//! vault.put("api-token", b"hunter2", 300).unwrap();
//! assert_eq!(vault.get("api-token").unwrap().as_slice(), b"hunter2");
//! ```

pub mod cli;
pub mod core;
pub mod error;
