//! Layering of configuration mappings.
//!
//! Merging is by top-level key: a key present in the overlay replaces the
//! base value entirely, including when the overlay value is null.

use serde_json::{Map, Value};

/// A configuration mapping keyed by external option name.
pub type ConfigMap = Map<String, Value>;

/// Merge two mappings, with `overlay` taking precedence over `base`.
///
/// Neither input is modified; keys absent from the overlay keep the base value.
///
/// # Example
/// ```
/// use serde_json::json;
/// use spotify_downloader::config::merge;
///
/// let base = json!({"overwrite": "prompt", "dry-run": false});
/// let overlay = json!({"dry-run": true});
/// let merged = merge(base.as_object().unwrap(), overlay.as_object().unwrap());
/// assert_eq!(merged["overwrite"], "prompt");
/// assert_eq!(merged["dry-run"], true);
/// ```
pub fn merge(base: &ConfigMap, overlay: &ConfigMap) -> ConfigMap {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Merge mappings in order, with later mappings taking precedence.
///
/// Equivalent to folding [`merge`] over the list, starting from an empty mapping.
pub fn merge_all(maps: impl IntoIterator<Item = ConfigMap>) -> ConfigMap {
    maps.into_iter()
        .fold(ConfigMap::new(), |merged, overlay| merge(&merged, &overlay))
}
