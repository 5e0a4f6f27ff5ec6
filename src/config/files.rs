//! On-disk config document: load, or bootstrap from defaults.

use super::defaults::DefaultTable;
use super::merge::ConfigMap;
use super::types::APP_SECTION;
use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Load the application section of the document at `path`.
///
/// A missing file is created from `defaults` and the defaults are returned.
/// An existing file that cannot be parsed, or that lacks the application
/// section, is an error.
pub fn load_or_create(path: &Path, defaults: &DefaultTable) -> ConfigResult<ConfigMap> {
    let path = std::path::absolute(path).map_err(|err| ConfigError::io(path, err))?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            debug!(path = %path.display(), "Loading config file");
            parse_document(&path, &content)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            write_default_document(&path, defaults)?;
            Ok(defaults.to_map())
        }
        Err(err) => Err(ConfigError::io(path, err)),
    }
}

/// Parse a YAML document and extract its application section.
pub fn parse_document(path: &Path, content: &str) -> ConfigResult<ConfigMap> {
    let document: Value =
        serde_yaml::from_str(content).map_err(|source| ConfigError::CorruptFile {
            path: path.to_path_buf(),
            source,
        })?;

    match document {
        Value::Object(mut root) => match root.remove(APP_SECTION) {
            Some(Value::Object(section)) => Ok(section),
            _ => Err(missing_section(path)),
        },
        _ => Err(missing_section(path)),
    }
}

fn missing_section(path: &Path) -> ConfigError {
    ConfigError::MissingSection {
        path: path.to_path_buf(),
        section: APP_SECTION.to_string(),
    }
}

/// Write the default document to `path`, creating parent directories.
///
/// Fails rather than replacing a file that already exists.
pub fn write_default_document(path: &Path, defaults: &DefaultTable) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| ConfigError::io(parent, err))?;
    }

    let yaml = serde_yaml::to_string(&defaults.to_document())?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| ConfigError::io(path, err))?;
    file.write_all(yaml.as_bytes())
        .map_err(|err| ConfigError::io(path, err))?;

    info!(path = %path.display(), "Created default config file");
    Ok(())
}
