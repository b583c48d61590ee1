//! Core library components.
//!
//! The encrypted, time-bounded secret store: master key handling, AEAD
//! sealing, the TTL store with its background sweep, and the vault that
//! composes them.

pub mod auth;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod keys;
pub mod store;
pub mod vault;
