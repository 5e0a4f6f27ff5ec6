//! Spotify Downloader
//!
//! Resolves the effective configuration for a download run and hands it to
//! the downloader.

use anyhow::Result;
use spotify_downloader::config::Resolver;
use spotify_downloader::error::ConfigError;
use spotify_downloader::logging;
use tracing::{Level, debug, info};

fn main() -> Result<()> {
    let resolver = Resolver::discover()?;

    // Resolution runs before the configured level is known; surface warnings only
    let resolved = tracing::subscriber::with_default(logging::subscriber(Level::WARN), || {
        resolver.resolve(std::env::args_os())
    });

    let invocation = match resolved {
        Ok(invocation) => invocation,
        Err(ConfigError::Cli(err)) => err.exit(),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.exit_code());
        }
    };

    let level = invocation.config.log_level;
    tracing::subscriber::set_global_default(logging::subscriber(level))?;

    info!(
        selection = invocation.target.kind(),
        value = %invocation.target.value(),
        "Configuration resolved"
    );
    debug!(
        severity = logging::severity_value(level),
        config_path = ?resolver.config_path(),
        config = ?invocation.config,
        "Effective configuration"
    );

    Ok(())
}
