//! Constants used throughout vaultify.
//!
//! Centralizes sizes, file names, and tunables.

use std::time::Duration;

/// Master key length in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// GCM nonce length in bytes. Every sealed blob starts with one.
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// How often the background sweep reclaims expired entries.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration file name (vaultify.toml).
pub const CONFIG_FILE: &str = "vaultify.toml";

/// Key storage directory relative to HOME (~/.vaultify).
pub const KEY_DIR: &str = ".vaultify";

/// Master key file name inside [`KEY_DIR`].
pub const KEY_FILE: &str = "master.key";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "VAULTIFY_LOG";

/// Optional prefix on an authorization header value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Unix mode for the master key file.
#[cfg(unix)]
pub const KEY_FILE_MODE: u32 = 0o600;

/// Longest TTL honored; larger values are clamped (ten years).
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;
