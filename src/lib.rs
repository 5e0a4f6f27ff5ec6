//! Spotify Downloader configuration library
//!
//! Resolves the effective runtime configuration from built-in defaults, the
//! on-disk `config.yml` and command-line flags.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
