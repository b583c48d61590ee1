//! Vaultify - An ephemeral secret vault.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaultify::cli::output;
use vaultify::cli::{execute, Cli};
use vaultify::core::config::{Config, LogFormat};
use vaultify::core::constants::LOG_ENV;
use vaultify::error::{AuthError, ConfigError, Error, KeyError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("vaultify=debug")
        } else {
            EnvFilter::new("vaultify=warn")
        }
    });

    // A broken config is reported by the command itself; here it only
    // decides the log format.
    let json = Config::load_or_default(&cli.config)
        .map(|c| c.log.format == LogFormat::Json)
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| {
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
        }))
        .init();

    if let Err(e) = execute(cli.command, &cli.config) {
        let suggestion = match &e {
            Error::Key(KeyError::Missing(_)) => Some("run: vaultify keygen"),
            Error::Key(KeyError::InvalidKeyLength { .. }) => {
                Some("the key file is corrupt; restore it from backup")
            }
            Error::Config(ConfigError::NotFound(_)) => Some("create vaultify.toml or pass --config"),
            Error::Auth(AuthError::MissingToken) => Some("pass --token or set VAULTIFY_TOKEN"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
