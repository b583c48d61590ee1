//! Master key creation command.

use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::core::config::Config;
use crate::core::keys::{KeyManager, KeyOrigin};
use crate::error::Result;

/// Create the master key if missing, otherwise verify it loads.
///
/// An existing key file is never overwritten.
pub fn execute(config_path: &Path, key_path: Option<PathBuf>) -> Result<()> {
    let key_path = match key_path {
        Some(path) => path,
        None => Config::load_or_default(config_path)?.key_path()?,
    };

    let manager = KeyManager::new(&key_path);
    let (_, origin) = manager.initialize_with_origin()?;

    match origin {
        KeyOrigin::Generated => {
            output::success(&format!("master key created at {}", output::path(&key_path)))
        }
        KeyOrigin::Loaded => {
            output::success(&format!("master key present at {}", output::path(&key_path)))
        }
    }
    Ok(())
}
