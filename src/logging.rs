//! Log level names and their runtime severities.
//!
//! Level names are accepted in any casing and stored uppercased. The resolver
//! itself only accepts uppercased names that already passed validation.

use crate::error::{ConfigError, ConfigResult};
use tracing::{Level, Subscriber};
use tracing_subscriber::FmtSubscriber;

/// Recognized level names, in the order shown to users.
pub const LOG_LEVELS: [&str; 4] = ["INFO", "WARNING", "ERROR", "DEBUG"];

/// Uppercase `name` and return the matching level name, if recognized.
pub fn normalize(name: &str) -> Option<&'static str> {
    let upper = name.to_ascii_uppercase();
    LOG_LEVELS.iter().copied().find(|level| *level == upper)
}

/// Map a validated level name to its tracing severity.
///
/// An unrecognized name means validation was skipped upstream and is reported
/// as [`ConfigError::UnknownLogLevel`].
pub fn resolve(level_name: &str) -> ConfigResult<Level> {
    match level_name {
        "INFO" => Ok(Level::INFO),
        "WARNING" => Ok(Level::WARN),
        "ERROR" => Ok(Level::ERROR),
        "DEBUG" => Ok(Level::DEBUG),
        other => Err(ConfigError::UnknownLogLevel(other.to_string())),
    }
}

/// Numeric severity on the conventional 10-step scale (DEBUG = 10 ... ERROR = 40).
pub fn severity_value(level: Level) -> u8 {
    match level {
        Level::TRACE => 5,
        Level::DEBUG => 10,
        Level::INFO => 20,
        Level::WARN => 30,
        Level::ERROR => 40,
    }
}

/// Stderr subscriber filtered at `level`.
pub fn subscriber(level: Level) -> impl Subscriber + Send + Sync + 'static {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_resolve_all_levels() {
        assert_eq!(resolve("INFO").unwrap(), Level::INFO);
        assert_eq!(resolve("WARNING").unwrap(), Level::WARN);
        assert_eq!(resolve("ERROR").unwrap(), Level::ERROR);
        assert_eq!(resolve("DEBUG").unwrap(), Level::DEBUG);
    }

    #[test]
    fn test_case_variants_resolve_the_same() {
        let lower = resolve(normalize("debug").unwrap()).unwrap();
        let upper = resolve(normalize("DEBUG").unwrap()).unwrap();
        let mixed = resolve(normalize("DeBuG").unwrap()).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(mixed, upper);
    }

    #[test]
    fn test_unvalidated_name_is_invariant_breach() {
        let err = resolve("debug").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantBreach);

        let err = resolve("VERBOSE").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLogLevel(ref name) if name == "VERBOSE"));
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        assert_eq!(normalize("warning"), Some("WARNING"));
        assert_eq!(normalize("warn"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn test_severity_values_ordered() {
        let values: Vec<u8> = [Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR]
            .into_iter()
            .map(severity_value)
            .collect();
        assert_eq!(values, vec![10, 20, 30, 40]);
    }
}
