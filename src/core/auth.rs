//! Caller authorization.
//!
//! Callers must pass [`Authorizer::authorize`] before touching the vault.
//! The whitelist keeps SHA-256 digests of tokens, not the tokens themselves.

use std::collections::HashSet;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::constants::BEARER_PREFIX;
use crate::error::{AuthError, Result};

/// Gate in front of vault operations.
pub trait Authorizer: Send + Sync {
    /// Check an authorization header value (`Bearer <token>` or a bare token).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` if no token was supplied, or
    /// `AuthError::Unauthorized` if it is not accepted.
    fn authorize(&self, header: Option<&str>) -> Result<()>;
}

/// Fixed set of accepted tokens. An empty whitelist accepts nobody.
#[derive(Default)]
pub struct TokenWhitelist {
    digests: HashSet<[u8; 32]>,
}

impl std::fmt::Debug for TokenWhitelist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenWhitelist")
            .field("tokens", &self.digests.len())
            .finish()
    }
}

fn digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

impl TokenWhitelist {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            digests: tokens.into_iter().map(|t| digest(t.as_ref())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

impl Authorizer for TokenWhitelist {
    fn authorize(&self, header: Option<&str>) -> Result<()> {
        let token = header
            .map(|h| h.strip_prefix(BEARER_PREFIX).unwrap_or(h).trim())
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        if self.digests.contains(&digest(token)) {
            Ok(())
        } else {
            debug!("rejected token");
            Err(AuthError::Unauthorized.into())
        }
    }
}
