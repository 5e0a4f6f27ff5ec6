//! Built-in default values for every recognized option.

use super::merge::ConfigMap;
use super::types::{APP_SECTION, InputExt, Overwrite, Settings};
use serde_json::Value;
use std::path::Path;

/// Default download folder name, created beside the executable.
pub const DEFAULT_FOLDER_NAME: &str = "Music";

/// Default output container.
pub const DEFAULT_OUTPUT_EXT: &str = ".mp3";

/// Default file name template.
pub const DEFAULT_FILE_FORMAT: &str = "{artist} - {track_name}";

/// Default log level name.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// The immutable default table.
///
/// Built once per process and passed explicitly to every resolution pass, so
/// two passes never observe each other's state.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTable {
    settings: Settings,
}

impl DefaultTable {
    /// Build the defaults for a program installed in `program_dir`.
    pub fn new(program_dir: &Path) -> Self {
        Self {
            settings: Settings {
                manual: false,
                no_metadata: false,
                avconv: false,
                folder: program_dir.join(DEFAULT_FOLDER_NAME),
                overwrite: Overwrite::Prompt,
                input_ext: InputExt::M4a,
                output_ext: DEFAULT_OUTPUT_EXT.to_string(),
                download_only_metadata: false,
                dry_run: false,
                music_videos_only: false,
                no_spaces: false,
                file_format: DEFAULT_FILE_FORMAT.to_string(),
                youtube_api_key: None,
                log_level: DEFAULT_LOG_LEVEL.to_string(),
            },
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The defaults as a document mapping.
    pub fn to_map(&self) -> ConfigMap {
        self.settings.to_map()
    }

    /// The full document written when a config file is bootstrapped.
    pub fn to_document(&self) -> Value {
        let mut root = ConfigMap::new();
        root.insert(APP_SECTION.to_string(), Value::Object(self.to_map()));
        Value::Object(root)
    }
}
