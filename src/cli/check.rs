//! Configuration and key validation command.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::keys::KeyManager;
use crate::error::Result;

/// Validate the config file and master key; never creates anything.
pub fn execute(config_path: &Path) -> Result<()> {
    let config_exists = config_path.exists();
    let config = Config::load_or_default(config_path)?;
    let key_path = config.key_path()?;

    output::header("Vaultify");
    if config_exists {
        output::kv("config", output::path(config_path));
    } else {
        output::kv("config", "defaults (no config file)");
    }
    output::kv("key", output::path(&key_path));
    output::kv(
        "sweep",
        format!("every {}s", config.store.sweep_interval_secs),
    );
    output::kv("tokens", config.auth.tokens.len());

    KeyManager::new(&key_path).load()?;

    if config.auth.tokens.is_empty() {
        output::warn("no tokens configured: every session will be rejected");
    }
    output::success("master key valid");
    Ok(())
}
