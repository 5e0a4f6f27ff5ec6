//! File name templates (`{artist} - {track_name}`).

use regex_lite::Regex;
use std::sync::LazyLock;

/// Tags that can appear in a file-format template.
pub const FILE_FORMAT_TAGS: [&str; 12] = [
    "track_name",
    "artist",
    "album",
    "album_artist",
    "genre",
    "disc_number",
    "duration",
    "year",
    "original_date",
    "track_number",
    "total_tracks",
    "isrc",
];

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// Names of all `{tag}` placeholders in `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Placeholders in `template` that are not known tags.
pub fn unknown_placeholders(template: &str) -> Vec<&str> {
    placeholders(template)
        .into_iter()
        .filter(|tag| !FILE_FORMAT_TAGS.contains(tag))
        .collect()
}
