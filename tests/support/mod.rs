//! Test support utilities for vaultify integration tests.
//!
//! Provides an isolated environment per test and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working dir and home dir. Child processes use
/// `.current_dir()` so tests can run in parallel.
pub struct Test {
    /// Working directory holding vaultify.toml and the key file
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create an empty environment with no config file.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create an environment with a config accepting `tokens` and a key
    /// path inside the working directory.
    pub fn with_tokens(tokens: &[&str]) -> Self {
        let t = Self::new();
        let tokens = tokens
            .iter()
            .map(|tok| format!("\"{}\"", tok))
            .collect::<Vec<_>>()
            .join(", ");
        t.write_config(&format!(
            "[encryption]\nkey_path = '{}'\n\n[auth]\ntokens = [{}]\n",
            t.key_path().display(),
            tokens
        ));
        t
    }

    /// Path of the master key used by `with_tokens` environments.
    pub fn key_path(&self) -> PathBuf {
        self.dir.path().join("master.key")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("vaultify.toml")
    }

    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).expect("failed to write config");
    }
}
