//! Structured error types for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Error categories for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A config document exists but cannot be used.
    CorruptFile,
    /// A supplied value is outside its allowed domain.
    ConstraintViolation,
    /// An internal check failed; not user-correctable.
    InvariantBreach,
    /// The config document could not be read or created.
    Io,
    /// Help/version requests and other non-constraint CLI outcomes.
    Usage,
}

/// Errors raised while resolving the effective configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {} is not valid YAML: {source}", .path.display())]
    CorruptFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config file {} has no `{section}` mapping", .path.display())]
    MissingSection { path: PathBuf, section: String },

    #[error("invalid value for `{key}`: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("unrecognized log level `{0}` reached the resolver")]
    UnknownLogLevel(String),

    #[error("failed to serialize default configuration: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_setting(key: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidSetting {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        use clap::error::ErrorKind as ClapKind;

        match self {
            ConfigError::Io { .. } => ErrorKind::Io,
            ConfigError::CorruptFile { .. } | ConfigError::MissingSection { .. } => {
                ErrorKind::CorruptFile
            }
            ConfigError::InvalidSetting { .. } => ErrorKind::ConstraintViolation,
            ConfigError::Cli(err) => match err.kind() {
                ClapKind::DisplayHelp
                | ClapKind::DisplayVersion
                | ClapKind::DisplayHelpOnMissingArgumentOrSubcommand => ErrorKind::Usage,
                _ => ErrorKind::ConstraintViolation,
            },
            ConfigError::UnknownLogLevel(_) | ConfigError::Serialize(_) => {
                ErrorKind::InvariantBreach
            }
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::Cli(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
