//! Configuration resolver with tier-based merging.
//!
//! Resolution is a pure function of the argument list, the default table and
//! the config file contents:
//! 1. Defaults ⊕ implicit `config.yml` give the help/parse defaults
//! 2. If `--config` is given, defaults ⊕ that file replace them
//! 3. Command-line values are layered on top

use super::defaults::DefaultTable;
use super::files::load_or_create;
use super::merge::merge_all;
use super::types::{ConfigurationSet, Invocation, Settings};
use crate::cli;
use crate::error::{ConfigError, ConfigResult};
use crate::paths;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the implicit config document.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Resolves command lines into [`Invocation`]s.
#[derive(Debug, Clone)]
pub struct Resolver {
    defaults: DefaultTable,
    /// Implicit config file; `None` resolves from defaults only and ignores `--config`
    config_path: Option<PathBuf>,
    /// Directory paths are resolved and displayed against
    cwd: PathBuf,
}

impl Resolver {
    /// Resolver for the running program: defaults and `config.yml` live in
    /// the executable's directory.
    pub fn discover() -> ConfigResult<Self> {
        let program_dir = paths::program_dir();
        let cwd = std::env::current_dir().map_err(|err| ConfigError::io(".", err))?;
        Ok(Self::new(
            DefaultTable::new(&program_dir),
            Some(program_dir.join(CONFIG_FILE_NAME)),
            cwd,
        ))
    }

    /// Create a resolver with explicit inputs.
    pub fn new(defaults: DefaultTable, config_path: Option<PathBuf>, cwd: PathBuf) -> Self {
        Self {
            defaults,
            config_path,
            cwd,
        }
    }

    /// Create a resolver that never reads or writes config files.
    pub fn defaults_only(defaults: DefaultTable, cwd: PathBuf) -> Self {
        Self::new(defaults, None, cwd)
    }

    pub fn defaults(&self) -> &DefaultTable {
        &self.defaults
    }

    /// Get the implicit config file path, if file merging is enabled.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Settings from the defaults merged with the file at `path`.
    ///
    /// With no path, the defaults alone.
    pub fn layered_settings(&self, path: Option<&Path>) -> ConfigResult<Settings> {
        let Some(path) = path else {
            return Ok(self.defaults.settings().clone());
        };
        let path = paths::absolutize(path, &self.cwd);
        let file = load_or_create(&path, &self.defaults)?;
        debug!(path = %path.display(), keys = file.len(), "Merging config file over defaults");

        let defaults = self.defaults.to_map();
        let keeps_default_folder = file.get("folder") == defaults.get("folder");
        let mut settings = Settings::from_map(&merge_all([defaults, file]))?;
        // The document holds a lossy rendering of non-UTF-8 paths.
        if keeps_default_folder {
            settings.folder = self.defaults.settings().folder.clone();
        }
        Ok(settings)
    }

    /// Resolve a full argument list, program name first.
    pub fn resolve<I, T>(&self, args: I) -> ConfigResult<Invocation>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        let implicit = self.layered_settings(self.config_path.as_deref())?;
        let parsed = cli::parse(args.iter().cloned(), &implicit, &self.cwd)?;

        let explicit = match self.config_path {
            Some(_) => parsed.options.config.clone(),
            None => None,
        };
        let (settings, parsed) = match explicit {
            Some(explicit) => {
                debug!(path = %explicit.display(), "Re-resolving with explicit config file");
                let settings = self.layered_settings(Some(&explicit))?;
                let parsed = cli::parse(args.iter().cloned(), &settings, &self.cwd)?;
                (settings, parsed)
            }
            None => (implicit, parsed),
        };

        let settings = parsed.options.apply_to(settings);
        let target = parsed.target.into_selection().ok_or_else(|| {
            ConfigError::invalid_setting("target", "exactly one download target is required")
        })?;
        let config = ConfigurationSet::from_settings(settings, &self.cwd)?;

        debug!(selection = target.kind(), "Configuration resolved");
        Ok(Invocation { target, config })
    }
}
