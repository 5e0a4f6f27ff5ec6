//! Configuration types and structures.

use super::merge::ConfigMap;
use crate::error::{ConfigError, ConfigResult};
use crate::logging;
use crate::paths;
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{Level, warn};

/// Name of the application section inside the config document.
pub const APP_SECTION: &str = "spotify-downloader";

/// External keys of every recognized option, in declaration order.
pub const SETTING_KEYS: [&str; 14] = [
    "manual",
    "no-metadata",
    "avconv",
    "folder",
    "overwrite",
    "input-ext",
    "output-ext",
    "download-only-metadata",
    "dry-run",
    "music-videos-only",
    "no-spaces",
    "file-format",
    "youtube-api-key",
    "log-level",
];

/// Policy when a destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Overwrite {
    /// Ask before replacing (default)
    #[default]
    Prompt,
    /// Always replace
    Force,
    /// Keep the existing file
    Skip,
}

impl Overwrite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Overwrite::Prompt => "prompt",
            Overwrite::Force => "force",
            Overwrite::Skip => "skip",
        }
    }
}

impl fmt::Display for Overwrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container format requested from YouTube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum InputExt {
    /// AAC in an MP4 container (default)
    #[default]
    #[serde(rename = ".m4a")]
    #[value(name = ".m4a")]
    M4a,
    /// Opus in a WebM container
    #[serde(rename = ".webm")]
    #[value(name = ".webm")]
    Webm,
}

impl InputExt {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputExt::M4a => ".m4a",
            InputExt::Webm => ".webm",
        }
    }
}

impl fmt::Display for InputExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of one config mapping, before command-line overrides.
///
/// Field names map to kebab-case keys in the document (`no_metadata` is
/// stored as `no-metadata`). `folder` holds the path as written, and
/// `log_level` holds the validated, uppercased level name.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub manual: bool,
    pub no_metadata: bool,
    pub avconv: bool,
    pub folder: PathBuf,
    pub overwrite: Overwrite,
    pub input_ext: InputExt,
    pub output_ext: String,
    pub download_only_metadata: bool,
    pub dry_run: bool,
    pub music_videos_only: bool,
    pub no_spaces: bool,
    pub file_format: String,
    pub youtube_api_key: Option<String>,
    pub log_level: String,
}

impl Settings {
    /// Build typed settings from a merged mapping.
    ///
    /// Every recognized key must be present with a value of the right shape.
    /// Unrecognized keys are logged and ignored.
    pub fn from_map(map: &ConfigMap) -> ConfigResult<Self> {
        for key in map.keys() {
            if !SETTING_KEYS.contains(&key.as_str()) {
                warn!(key = %key, "Ignoring unrecognized config key");
            }
        }

        let log_level: String = take(map, "log-level")?;
        let log_level = logging::normalize(&log_level).ok_or_else(|| {
            ConfigError::invalid_setting(
                "log-level",
                format!(
                    "`{}` is not one of {}",
                    log_level,
                    logging::LOG_LEVELS.join(", ")
                ),
            )
        })?;

        Ok(Self {
            manual: take(map, "manual")?,
            no_metadata: take(map, "no-metadata")?,
            avconv: take(map, "avconv")?,
            folder: take(map, "folder")?,
            overwrite: take(map, "overwrite")?,
            input_ext: take(map, "input-ext")?,
            output_ext: take(map, "output-ext")?,
            download_only_metadata: take(map, "download-only-metadata")?,
            dry_run: take(map, "dry-run")?,
            music_videos_only: take(map, "music-videos-only")?,
            no_spaces: take(map, "no-spaces")?,
            file_format: take(map, "file-format")?,
            youtube_api_key: take(map, "youtube-api-key")?,
            log_level: log_level.to_string(),
        })
    }

    /// Convert back into a document mapping keyed by external names.
    ///
    /// YAML documents are UTF-8, so a non-UTF-8 `folder` is rendered lossily.
    pub fn to_map(&self) -> ConfigMap {
        let mut map = ConfigMap::new();
        map.insert("manual".into(), Value::Bool(self.manual));
        map.insert("no-metadata".into(), Value::Bool(self.no_metadata));
        map.insert("avconv".into(), Value::Bool(self.avconv));
        map.insert(
            "folder".into(),
            Value::String(self.folder.to_string_lossy().into_owned()),
        );
        map.insert("overwrite".into(), self.overwrite.as_str().into());
        map.insert("input-ext".into(), self.input_ext.as_str().into());
        map.insert("output-ext".into(), self.output_ext.clone().into());
        map.insert(
            "download-only-metadata".into(),
            Value::Bool(self.download_only_metadata),
        );
        map.insert("dry-run".into(), Value::Bool(self.dry_run));
        map.insert(
            "music-videos-only".into(),
            Value::Bool(self.music_videos_only),
        );
        map.insert("no-spaces".into(), Value::Bool(self.no_spaces));
        map.insert("file-format".into(), self.file_format.clone().into());
        map.insert(
            "youtube-api-key".into(),
            self.youtube_api_key
                .clone()
                .map_or(Value::Null, Value::String),
        );
        map.insert("log-level".into(), self.log_level.clone().into());
        map
    }
}

fn take<T: DeserializeOwned>(map: &ConfigMap, key: &str) -> ConfigResult<T> {
    let value = map
        .get(key)
        .ok_or_else(|| ConfigError::invalid_setting(key, "missing from configuration"))?;
    T::deserialize(value).map_err(|err| ConfigError::invalid_setting(key, err))
}

/// The fully resolved configuration handed to the downloader.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSet {
    pub manual: bool,
    pub no_metadata: bool,
    pub avconv: bool,
    /// Download folder, relative to the working directory.
    pub folder: PathBuf,
    pub overwrite: Overwrite,
    pub input_ext: InputExt,
    pub output_ext: String,
    pub download_only_metadata: bool,
    pub dry_run: bool,
    pub music_videos_only: bool,
    pub no_spaces: bool,
    pub file_format: String,
    pub youtube_api_key: Option<String>,
    pub log_level: Level,
}

impl ConfigurationSet {
    /// Finalize settings: relativize the folder against `cwd` and resolve the
    /// log level to its runtime severity.
    pub fn from_settings(settings: Settings, cwd: &Path) -> ConfigResult<Self> {
        for tag in super::template::unknown_placeholders(&settings.file_format) {
            warn!(tag = %tag, format = %settings.file_format, "Unknown file-format placeholder");
        }

        Ok(Self {
            manual: settings.manual,
            no_metadata: settings.no_metadata,
            avconv: settings.avconv,
            folder: paths::relative_to(&settings.folder, cwd),
            overwrite: settings.overwrite,
            input_ext: settings.input_ext,
            output_ext: settings.output_ext,
            download_only_metadata: settings.download_only_metadata,
            dry_run: settings.dry_run,
            music_videos_only: settings.music_videos_only,
            no_spaces: settings.no_spaces,
            log_level: logging::resolve(&settings.log_level)?,
            file_format: settings.file_format,
            youtube_api_key: settings.youtube_api_key,
        })
    }
}

/// What to download in this invocation. Exactly one is given per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionTarget {
    /// Spotify link or free-text song name
    Song(String),
    /// Text file with one song per line
    List(String),
    /// Playlist URL
    Playlist(String),
    /// Album URL
    Album(String),
    /// Spotify username whose playlists are listed
    Username(String),
    /// Saved-tracks source
    SavedTracks(String),
}

impl SelectionTarget {
    /// Long flag name this target was given with.
    pub fn kind(&self) -> &'static str {
        match self {
            SelectionTarget::Song(_) => "song",
            SelectionTarget::List(_) => "list",
            SelectionTarget::Playlist(_) => "playlist",
            SelectionTarget::Album(_) => "album",
            SelectionTarget::Username(_) => "username",
            SelectionTarget::SavedTracks(_) => "savedtracks",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            SelectionTarget::Song(v)
            | SelectionTarget::List(v)
            | SelectionTarget::Playlist(v)
            | SelectionTarget::Album(v)
            | SelectionTarget::Username(v)
            | SelectionTarget::SavedTracks(v) => v,
        }
    }
}

/// Result of resolving one command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub target: SelectionTarget,
    pub config: ConfigurationSet,
}
