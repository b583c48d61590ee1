//! Command-line interface.

pub mod check;
pub mod keygen;
pub mod output;
pub mod session;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::core::constants;

/// Vaultify - An ephemeral secret vault.
#[derive(Parser)]
#[command(
    name = "vaultify",
    about = "An ephemeral secret vault: sealed at rest, gone when the TTL runs out",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = constants::CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create the master key if absent, or verify the existing one
    Keygen {
        /// Key file path (overrides encryption.key_path)
        #[arg(long)]
        key_path: Option<PathBuf>,
    },

    /// Validate configuration and master key without starting a vault
    Check,

    /// Read put/get commands from stdin against a live in-memory vault
    Session {
        /// Bearer token checked against auth.tokens
        #[arg(long, env = "VAULTIFY_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

/// Execute a CLI command.
pub fn execute(command: Command, config_path: &Path) -> crate::error::Result<()> {
    match command {
        Command::Keygen { key_path } => keygen::execute(config_path, key_path),
        Command::Check => check::execute(config_path),
        Command::Session { token } => session::execute(config_path, token.as_deref()),
    }
}
